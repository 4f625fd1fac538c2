// Handler modules
pub mod convert;

// Re-export all handler functions
pub use convert::{
    convert, handle_convert, render, ContentMode, ConversionObserver, ConversionReport,
    ConvertOptions, LogObserver,
};
