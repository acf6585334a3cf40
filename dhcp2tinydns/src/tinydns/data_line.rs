use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors returned when reading a data line from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataLineError {
    #[error("empty data line")]
    Empty,
    #[error("unknown tinydns marker '{0}'")]
    UnknownMarker(char),
}

/// Leading character that selects the kind of a data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `%` client location prefix.
    Location,
    /// `.` name server plus SOA.
    NameServerSoa,
    /// `&` name server without SOA.
    NameServer,
    /// `=` address record plus matching PTR.
    AliasWithPtr,
    /// `+` address record only.
    Alias,
    /// `-` disabled address record.
    AliasDisabled,
    /// `@` mail exchanger.
    MailExchange,
    /// `'` TXT record.
    Text,
    /// `^` PTR record.
    Pointer,
    /// `C` CNAME record.
    Cname,
    /// `Z` SOA record.
    Soa,
    /// `:` generic record.
    Generic,
    /// `#` comment.
    Comment,
}

impl Marker {
    pub fn from_char(c: char) -> Option<Self> {
        let marker = match c {
            '%' => Self::Location,
            '.' => Self::NameServerSoa,
            '&' => Self::NameServer,
            '=' => Self::AliasWithPtr,
            '+' => Self::Alias,
            '-' => Self::AliasDisabled,
            '@' => Self::MailExchange,
            '\'' => Self::Text,
            '^' => Self::Pointer,
            'C' => Self::Cname,
            'Z' => Self::Soa,
            ':' => Self::Generic,
            '#' => Self::Comment,
            _ => return None,
        };
        Some(marker)
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Location => '%',
            Self::NameServerSoa => '.',
            Self::NameServer => '&',
            Self::AliasWithPtr => '=',
            Self::Alias => '+',
            Self::AliasDisabled => '-',
            Self::MailExchange => '@',
            Self::Text => '\'',
            Self::Pointer => '^',
            Self::Cname => 'C',
            Self::Soa => 'Z',
            Self::Generic => ':',
            Self::Comment => '#',
        }
    }
}

/// One line of the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine {
    marker: Marker,
    fields: Vec<String>,
}

impl DataLine {
    pub fn new(marker: Marker, fields: Vec<String>) -> Self {
        Self { marker, fields }
    }

    /// Read a line as found in a data file.
    ///
    /// Comment text is kept whole; every other line is split on `:`.
    pub fn parse(raw: &str) -> Result<Self, DataLineError> {
        let mut chars = raw.chars();
        let first = chars.next().ok_or(DataLineError::Empty)?;
        let marker = Marker::from_char(first).ok_or(DataLineError::UnknownMarker(first))?;
        let rest = chars.as_str();

        let fields = match marker {
            Marker::Comment => vec![rest.to_string()],
            _ => rest.split(':').map(str::to_string).collect(),
        };
        Ok(Self { marker, fields })
    }

    /// An `=` line: `host_name` resolves to `ip` and `ip` reverses to `host_name`.
    pub fn alias(host_name: &str, ip: Ipv4Addr, ttl: Option<u32>) -> Self {
        let mut fields = vec![host_name.to_string(), ip.to_string()];
        if let Some(ttl) = ttl {
            fields.push(ttl.to_string());
        }
        Self::new(Marker::AliasWithPtr, fields)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(Marker::Comment, vec![text.into()])
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Octal escape tinydns-data reads back as a literal `:` inside a field.
const ESCAPED_COLON: &str = "\\072";

impl Display for DataLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.marker == Marker::Comment {
            return write!(f, "#{}", self.fields.concat());
        }
        let body = self
            .fields
            .iter()
            .map(|field| field.replace(':', ESCAPED_COLON))
            .collect::<Vec<_>>()
            .join(":");
        write!(f, "{}{}", self.marker.as_char(), body.trim_end_matches(':'))
    }
}
