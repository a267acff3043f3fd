//! Declarative schema macros.
//!
//! [`settings_schema!`](crate::settings_schema) turns a field table into a
//! [`Settings`](crate::Settings) implementation, so most types never spell
//! out the builder calls by hand. [`settings_enum!`](crate::settings_enum)
//! generates a closed enum together with its scalar codec.

/// Implements [`Settings`](crate::Settings) for a type from a field table.
///
/// Each row names the struct field, the shape of the binding, and optionally
/// a JSON name and a default literal:
///
/// - `scalar field` - a scalar field reset to its type's zero value
/// - `scalar field = literal` - a scalar field with a declared default
/// - `nested field` - a child settings object, always present
/// - `list field` - a sequence of scalar elements
/// - `records field` - a sequence of child settings objects
///
/// Any row may carry `as "JsonName"` to override the JSON member name, which
/// otherwise defaults to the field name.
///
/// # Examples
///
/// ```rust
/// use settrix::{SettingsExt, settings_schema};
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u32,
///     verbose: bool,
/// }
///
/// settings_schema!(Server {
///     scalar host as "Host" = "localhost",
///     scalar port as "Port" = 8080,
///     scalar verbose as "Verbose",
/// });
///
/// let server = Server::construct()?;
/// assert_eq!(server.host, "localhost");
/// assert_eq!(server.port, 8080);
/// assert!(!server.verbose);
/// # Ok::<(), settrix::Error>(())
/// ```
#[macro_export]
macro_rules! settings_schema {
    (
        $ty:ty {
            $( $kind:ident $field:ident $( as $json:literal )? $( = $default:expr )? ),* $(,)?
        }
    ) => {
        impl $crate::Settings for $ty {
            fn schema() -> $crate::Schema<Self> {
                let schema = $crate::Schema::new();
                $(
                    let schema = $crate::__settings_schema_field!(
                        schema, $kind $field $( as $json )? $( = $default )?
                    );
                )*
                schema
            }
        }
    };
}

/// Dispatches one `settings_schema!` row onto the matching builder call.
#[doc(hidden)]
#[macro_export]
macro_rules! __settings_schema_field {
    ($schema:expr, scalar $field:ident $( as $json:literal )? $( = $default:expr )?) => {{
        let schema = $schema.scalar(
            stringify!($field),
            |s: &Self| &s.$field,
            |s: &mut Self| &mut s.$field,
        );
        $( let schema = schema.json_name($json); )?
        $( let schema = schema.default_literal($crate::Literal::from($default)); )?
        schema
    }};
    ($schema:expr, nested $field:ident $( as $json:literal )?) => {{
        let schema = $schema.nested(
            stringify!($field),
            |s: &Self| &s.$field,
            |s: &mut Self| &mut s.$field,
        );
        $( let schema = schema.json_name($json); )?
        schema
    }};
    ($schema:expr, list $field:ident $( as $json:literal )?) => {{
        let schema = $schema.scalar_list(
            stringify!($field),
            |s: &Self| &s.$field,
            |s: &mut Self| &mut s.$field,
        );
        $( let schema = schema.json_name($json); )?
        schema
    }};
    ($schema:expr, records $field:ident $( as $json:literal )?) => {{
        let schema = $schema.settings_list(
            stringify!($field),
            |s: &Self| &s.$field,
            |s: &mut Self| &mut s.$field,
        );
        $( let schema = schema.json_name($json); )?
        schema
    }};
}

/// Generates a closed enum usable as a scalar settings value.
///
/// The first member is the zero value a field resets to when no default is
/// declared. The JSON form is the member name as a string; reading accepts
/// the name in any ASCII case, and `null` decodes as the zero value. Default
/// literals accept either a member name or a zero-based declaration position.
///
/// # Examples
///
/// ```rust
/// use settrix::{ScalarValue, settings_enum};
///
/// settings_enum!(pub enum LogLevel { Error, Warning, Info });
///
/// assert_eq!(LogLevel::default(), LogLevel::Error);
/// assert_eq!(LogLevel::Info.to_json(), settrix::serde_json::json!("Info"));
///
/// let parsed = LogLevel::from_json(&settrix::serde_json::json!("warning"))?;
/// assert_eq!(parsed, LogLevel::Warning);
/// # Ok::<(), settrix::scalar::ScalarError>(())
/// ```
#[macro_export]
macro_rules! settings_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident $(, $rest:ident)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis enum $name {
            #[default]
            $first,
            $( $rest, )*
        }

        impl $name {
            /// Every member paired with its declared name, in order.
            const MEMBERS: &'static [(&'static str, $name)] = &[
                (stringify!($first), $name::$first),
                $( (stringify!($rest), $name::$rest), )*
            ];
        }

        impl $crate::ScalarValue for $name {
            fn scalar_kind() -> &'static str {
                stringify!($name)
            }

            fn zero() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(Self::default())
            }

            fn to_json(&self) -> $crate::serde_json::Value {
                let name = match self {
                    $name::$first => stringify!($first),
                    $( $name::$rest => stringify!($rest), )*
                };
                $crate::serde_json::Value::String(name.to_string())
            }

            fn from_json(
                value: &$crate::serde_json::Value,
            ) -> ::std::result::Result<Self, $crate::scalar::ScalarError> {
                match value {
                    $crate::serde_json::Value::Null => ::std::result::Result::Ok(Self::default()),
                    $crate::serde_json::Value::String(text) => {
                        $crate::scalar::enum_member_by_name(text, Self::MEMBERS, stringify!($name))
                    }
                    other => ::std::result::Result::Err($crate::scalar::ScalarError::TypeMismatch {
                        expected: stringify!($name),
                        actual: $crate::scalar::json_kind(other).to_string(),
                    }),
                }
            }

            fn from_literal(
                literal: &$crate::Literal,
            ) -> ::std::result::Result<Self, $crate::scalar::ScalarError> {
                match literal {
                    $crate::Literal::Str(text) => {
                        $crate::scalar::enum_member_by_name(text, Self::MEMBERS, stringify!($name))
                    }
                    $crate::Literal::Int(ordinal) => $crate::scalar::enum_member_by_ordinal(
                        *ordinal,
                        Self::MEMBERS,
                        stringify!($name),
                    ),
                    $crate::Literal::Null => {
                        ::std::result::Result::Err($crate::scalar::ScalarError::NullDefault {
                            target: stringify!($name),
                        })
                    }
                    other => ::std::result::Result::Err($crate::scalar::ScalarError::InvalidLiteral {
                        target: stringify!($name),
                        literal: other.to_string(),
                        reason: "expected a member name or position".to_string(),
                    }),
                }
            }
        }
    };
}
