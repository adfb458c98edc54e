use std::borrow::Cow;

/// A specialized [`RegistryError`] enum of this crate.
#[symloc_derive::symloc_error]
pub enum RegistryError {
    /// A hierarchical prefix that does not end with the namespace separator.
    #[error("Invalid prefix{}: {message}", format_context(.context))]
    InvalidPrefix { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The host could not read a resolved or registered source unit.
    #[error("Failed to materialize source unit{}: {source}", format_context(.context))]
    Materialize { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The host read the source unit but refused to load it.
    #[error("Host rejected source unit{}: {message}", format_context(.context))]
    Host { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal registry fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
