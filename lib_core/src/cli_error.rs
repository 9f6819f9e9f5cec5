use std::fmt;

use colored::Colorize;

pub trait CliErrorTrait: std::fmt::Debug + Send + Sync + 'static {
    fn details(&self) -> CliErrorDetails<'_>;
}

pub type CliError = Box<dyn CliErrorTrait>;

#[derive(Debug)]
pub struct CliErrorDetails<'a> {
    /// Name of the error type, as declared with `define_cli_error!`.
    pub kind: &'static str,
    pub context: &'a str,
    pub message: &'a str,
    pub debug: Option<&'a str>,
}

impl dyn CliErrorTrait {
    pub fn kind(&self) -> &'static str {
        self.details().kind
    }

    pub fn is<T: CliErrorKind>(&self) -> bool {
        self.kind() == T::KIND
    }
}

impl fmt::Display for dyn CliErrorTrait {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let details = self.details();
        write!(f, "{}", details.message.bold())?;
        if let Some(debug) = details.debug {
            write!(f, "\n  caused by: {}", debug)?;
        }
        Ok(())
    }
}

impl std::error::Error for dyn CliErrorTrait {}

/// Implemented by every error declared with `define_cli_error!`.
pub trait CliErrorKind {
    const KIND: &'static str;
}

// Definining custom CLI errors.
// --------------------------------------------------

#[macro_export]
macro_rules! define_cli_error {
    ($name:ident, $msg:expr) => {
        define_cli_error!($name, $msg, {});
    };
    ($name:ident, $msg:expr, { $($arg:ident : $argtype:ty),* $(,)? }) => {
        #[derive(Debug)]
        pub struct $name {
            context: String,
            message: String,
            debug: Option<String>,
        }

        impl $name {
            #[allow(dead_code)]
            #[track_caller]
            pub fn new($($arg: $argtype),*) -> $crate::CliError {
                Box::new($name {
                    context: std::backtrace::Backtrace::force_capture().to_string(),
                    message: format!($msg, $($arg = $arg),*),
                    debug: None,
                })
            }

            #[allow(dead_code)]
            #[track_caller]
            pub fn with_debug<D>(
                $($arg: $argtype,)*
                debug: &D,
            ) -> $crate::CliError where D: std::fmt::Debug + ?Sized {
                Box::new($name {
                    context: std::backtrace::Backtrace::force_capture().to_string(),
                    message: format!($msg, $($arg = $arg),*),
                    debug: Some(format!("{:?}", debug)),
                })
            }
        }

        impl $crate::CliErrorKind for $name {
            const KIND: &'static str = stringify!($name);
        }

        impl $crate::CliErrorTrait for $name {
            fn details(&self) -> $crate::CliErrorDetails<'_> {
                $crate::CliErrorDetails {
                    kind: stringify!($name),
                    context: &self.context,
                    message: &self.message,
                    debug: self.debug.as_deref(),
                }
            }
        }
    };
}

// Standard errors.
// --------------------------------------------------

define_cli_error!(CriticalError, "Unexpected: {details}.", { details: &str });
define_cli_error!(IOError, "IO error.");

// Workflow errors.
// --------------------------------------------------

define_cli_error!(MissingLocalFile, "File not found: {path}", { path: &std::path::Display<'_> });
define_cli_error!(
    MissingRemoteParameter,
    "Parameter {name} does not exist in the parameter store.",
    { name: &str }
);
define_cli_error!(InvalidJson, "Invalid JSON in {source_name}.", { source_name: &str });
define_cli_error!(
    MissingRequiredField,
    "Missing '{field}' field in {source_name}.",
    { field: &str, source_name: &str }
);
define_cli_error!(
    CloneFailure,
    "Failed to clone branch '{branch}' of {url}.",
    { url: &str, branch: &str }
);
define_cli_error!(WriteFailure, "Failed to write parameter {name}.", { name: &str });
define_cli_error!(ReadFailure, "Failed to read parameter {name}.", { name: &str });
