pub use rowkit_core::*;
