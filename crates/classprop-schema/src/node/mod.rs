mod builtin;
mod property;
mod schema;
mod type_decl;

pub use builtin::*;
pub use property::*;
pub use schema::*;
pub use type_decl::*;
