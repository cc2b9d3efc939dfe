pub mod path;

pub use path::resolve_alias;
