//! Catalog tables compiled from `data/*.ron` by the build script.

include!(concat!(env!("OUT_DIR"), "/generated_data.rs"));
