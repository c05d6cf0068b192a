use crate::context::Context;
use crate::diagnostic::{DcResult, Diagnostic, DiagnosticConsumer, ErrorCode};
use crate::property::PropertyDesc;
use crate::reader::Reader;
use crate::registry::HandlerRegistry;

/// A handler set plus the options its handlers read.
///
/// Implemented by [`Deserializer`](crate::Deserializer) and
/// [`Serializer`](crate::Serializer), which differ in which side of the
/// context describes the expected value.
pub trait Engine: Sized + Send + Sync + 'static {
    /// Names the engine in logs and diagnostics.
    const NAME: &'static str;

    type Options;

    fn registry(&self) -> &HandlerRegistry<Self>;

    fn options(&self) -> &Self::Options;

    fn max_depth(&self) -> usize;

    fn consumer(&self) -> &dyn DiagnosticConsumer;

    /// The static type of the next value, asked from the side that knows it.
    fn expected_property(ctx: &mut Context<'_, Self>) -> DcResult<Option<PropertyDesc>>;
}

/// Resolves and runs the handler of the next value.
///
/// Checks that the handler consumed exactly one node and left the path as it
/// found it. The innermost failure gets the path and both cursor positions.
pub(crate) fn dispatch_one<E: Engine>(ctx: &mut Context<'_, E>) -> DcResult<()> {
    let result = invoke(ctx);
    result.map_err(|mut err| {
        if !err.has_location() {
            err.set_location(
                ctx.path.snapshot(),
                ctx.reader.format_position(),
                ctx.writer.format_position(),
            );
        }
        err
    })
}

fn invoke<E: Engine>(ctx: &mut Context<'_, E>) -> DcResult<()> {
    let engine = ctx.engine();
    let depth = ctx.path.depth();
    if depth >= engine.max_depth() {
        return Err(Diagnostic::new(ErrorCode::DepthLimit).with_arg("max", engine.max_depth()));
    }

    let desc = E::expected_property(ctx)?;
    let entry = match &desc {
        Some(desc) => desc.entry,
        None => ctx.reader.peek()?,
    };
    let (handler, tier) = engine.registry().resolve(desc.as_ref(), entry)?;
    log::trace!(
        "{} {entry} at {} by {tier} handler",
        E::NAME,
        ctx.path
    );

    let mark = ctx.reader.mark();
    let saved = ctx.replace_property(desc);
    let result = handler(ctx);
    ctx.replace_property(saved);
    result?;

    ctx.reader.verify(mark)?;
    if ctx.path.depth() != depth {
        return Err(Diagnostic::new(ErrorCode::PathUnbalanced)
            .with_arg("before", depth)
            .with_arg("after", ctx.path.depth()));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::context::Context;
    use crate::data::DataEntry;
    use crate::de::{DeserializeOptions, Deserializer};
    use crate::diagnostic::ErrorCode;
    use crate::json::{JsonReader, JsonWriter};
    use crate::path::PathFrame;
    use crate::reader::Reader;

    #[test]
    fn failures_carry_location() {
        let mut engine = Deserializer::new();
        engine.registry_mut().register_entry(DataEntry::ArrayRoot, |ctx| {
            ctx.reader.read_array_root()?;
            ctx.enter(PathFrame::new(DataEntry::ArrayRoot, ""));
            ctx.set_segment(crate::PathSegment::Index(0));
            ctx.dispatch()?;
            ctx.leave(DataEntry::ArrayEnd)?;
            ctx.reader.read_array_end()
        });

        let doc = json!([true]);
        let mut reader = JsonReader::new(&doc);
        let mut writer = JsonWriter::new();
        let mut ctx = Context::new(&engine, &mut reader, &mut writer);
        ctx.prepare().unwrap();

        let err = ctx.deserialize().unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoHandler);
        assert_eq!(err.path(), Some("$[0]"));
        assert_eq!(err.reader_position(), Some("#/0"));
        assert_eq!(err.writer_position(), Some("#"));
    }

    #[test]
    fn unbalanced_path_and_depth_limit() {
        let mut engine = Deserializer::new();
        engine.registry_mut().register_entry(DataEntry::Bool, |ctx| {
            ctx.reader.read_bool()?;
            ctx.enter(PathFrame::new(DataEntry::StructRoot, "Leak"));
            Ok(())
        });

        let doc = json!(true);
        let mut reader = JsonReader::new(&doc);
        let mut writer = JsonWriter::new();
        let mut ctx = Context::new(&engine, &mut reader, &mut writer);
        ctx.prepare().unwrap();
        assert_eq!(ctx.deserialize().unwrap_err().code(), ErrorCode::PathUnbalanced);
        assert!(ctx.path.is_empty());

        let options = DeserializeOptions {
            max_depth: 2,
            ..DeserializeOptions::default()
        };
        let engine = Deserializer::pipe().with_options(options);
        let doc = json!([[[1]]]);
        let mut reader = JsonReader::new(&doc);
        let mut writer = JsonWriter::new();
        let mut ctx = Context::new(&engine, &mut reader, &mut writer);
        ctx.prepare().unwrap();

        let err = ctx.deserialize().unwrap_err();
        assert_eq!(err.code(), ErrorCode::DepthLimit);
        assert_eq!(err.path(), Some("$[0][0]"));
    }
}
