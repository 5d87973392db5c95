//! Type mapping between source column types and language-specific types.

/// Language-agnostic classification of a source column type.
///
/// Source types are PostgreSQL type names as they appear in the `Type`
/// column of a table definition. Use a [`TypeMapper`] to convert the
/// classification to a language-specific type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// 64-bit integer (`bigint`, `bigserial`, narrow `numeric`)
    BigInt,
    /// 32-bit integer (`integer`, `smallint`, narrow `numeric`)
    Int,
    /// Arbitrary-precision decimal
    Decimal,
    Text,
    Bool,
    /// Point in time (`timestamp`, `date`)
    Instant,
    /// Time of day
    Time,
    Bytes,
    /// Anything without a mapping
    Other,
}

impl SqlType {
    /// Classify a source type name, using the length for `numeric`/`decimal`.
    ///
    /// Never fails: unknown type names classify as [`SqlType::Other`].
    pub fn classify(source: &str, length: Option<&str>) -> Self {
        match source.trim().to_lowercase().as_str() {
            "bigserial" | "bigint" => SqlType::BigInt,
            "integer" | "smallint" => SqlType::Int,
            "numeric" | "decimal" => Self::classify_decimal(length),
            "varchar" | "char" | "text" | "bit" => SqlType::Text,
            "boolean" => SqlType::Bool,
            "timestamp" | "date" => SqlType::Instant,
            "time" => SqlType::Time,
            "bytea" => SqlType::Bytes,
            _ => SqlType::Other,
        }
    }

    fn classify_decimal(length: Option<&str>) -> Self {
        match length.and_then(Precision::parse) {
            Some(p) if p.scale == 0 && p.precision <= 9 => SqlType::Int,
            Some(p) if p.scale == 0 && p.precision <= 18 => SqlType::BigInt,
            _ => SqlType::Decimal,
        }
    }

    /// Whether this is one of the numeric classes.
    pub fn is_numeric(&self) -> bool {
        matches!(self, SqlType::BigInt | SqlType::Int | SqlType::Decimal)
    }

    /// Short lowercase name, used in summaries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::BigInt => "bigint",
            SqlType::Int => "int",
            SqlType::Decimal => "decimal",
            SqlType::Text => "text",
            SqlType::Bool => "bool",
            SqlType::Instant => "instant",
            SqlType::Time => "time",
            SqlType::Bytes => "bytes",
            SqlType::Other => "other",
        }
    }
}

/// Precision and scale encoded in a length value such as `10,2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub precision: u32,
    pub scale: u32,
}

impl Precision {
    /// Parse `precision[,scale]`. A missing scale is zero.
    pub fn parse(length: &str) -> Option<Self> {
        let mut parts = length.split(',').map(str::trim);
        let precision = parts.next()?.parse().ok()?;
        let scale = match parts.next() {
            Some(s) => s.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() || scale > precision {
            return None;
        }
        Some(Self { precision, scale })
    }

    /// Number of digits allowed before the decimal point.
    pub fn integer_digits(&self) -> u32 {
        self.precision - self.scale
    }
}

/// Trait for mapping source column types to language-specific type strings.
///
/// Implement this trait for each target language to provide type mappings.
pub trait TypeMapper {
    /// The target language name
    fn language(&self) -> &'static str;

    /// Map a classified type to a language-specific type string
    fn map_type(&self, ty: SqlType) -> &'static str;

    /// Classify and map a raw source type in one step
    fn map_column_type(&self, source: &str, length: Option<&str>) -> &'static str {
        self.map_type(SqlType::classify(source, length))
    }
}
