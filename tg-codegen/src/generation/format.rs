use std::{fmt, str::FromStr};

/// Artifact format identifiers, as used in `export.defaultFormats` and
/// on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Ddl,
    DdlPlay,
    TypeScript,
    ZodSchema,
    ZodType,
    JavaModel,
    JavaRepo,
    JavaService,
    JavaController,
    VscodeSnippets,
}

impl Format {
    /// Every format, in generation order.
    pub const ALL: [Format; 10] = [
        Format::Ddl,
        Format::DdlPlay,
        Format::TypeScript,
        Format::ZodSchema,
        Format::ZodType,
        Format::JavaModel,
        Format::JavaRepo,
        Format::JavaService,
        Format::JavaController,
        Format::VscodeSnippets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Ddl => "ddl",
            Format::DdlPlay => "ddl-play",
            Format::TypeScript => "typescript",
            Format::ZodSchema => "zod-schema",
            Format::ZodType => "zod-type",
            Format::JavaModel => "java-model",
            Format::JavaRepo => "java-repo",
            Format::JavaService => "java-service",
            Format::JavaController => "java-controller",
            Format::VscodeSnippets => "vscode-snippets",
        }
    }

    /// Parse a list of identifiers, keeping first-seen order and dropping
    /// duplicates.
    pub fn parse_list<'a>(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<Format>, String> {
        let mut formats = Vec::new();
        for name in names {
            let format = name.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Format::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = Format::ALL.iter().map(Format::as_str).collect();
                format!("unknown format '{s}', expected one of: {}", known.join(", "))
            })
    }
}
