#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use dx_core as core;
pub use dx_ptr as ptr;
pub use dx_reflect as reflect;
pub use dx_utils as utils;
