use std::borrow::Cow;
use symloc_derive::symloc_error;

#[symloc_error]
pub enum DemoError {
    #[error("Probe failed{}: {source}", format_context(.context))]
    Probe {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid prefix{}: {message}", format_context(.context))]
    InvalidPrefix { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn probe() -> Result<()> {
    Err(std::io::Error::other("denied")).context("Probing vendor/autoload")
}

fn main() {
    let err = probe().unwrap_err();
    assert!(err.to_string().contains("vendor/autoload"));

    let internal: DemoError = "boom".into();
    assert!(matches!(internal, DemoError::Internal { .. }));
}
