/// Object status as reported in PRTG's `status_raw` column.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Status {
    Unknown,
    Scanning,
    Up,
    Warning,
    Down,
    NoProbe,
    PausedByUser,
    PausedByDependency,
    PausedBySchedule,
    Unusual,
    NotLicensed,
    PausedUntil,
    DownAcknowledged,
    DownPartial,
    Other(u32),
}

impl Status {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Status::Unknown,
            2 => Status::Scanning,
            3 => Status::Up,
            4 => Status::Warning,
            5 => Status::Down,
            6 => Status::NoProbe,
            7 => Status::PausedByUser,
            8 => Status::PausedByDependency,
            9 => Status::PausedBySchedule,
            10 => Status::Unusual,
            11 => Status::NotLicensed,
            12 => Status::PausedUntil,
            13 => Status::DownAcknowledged,
            14 => Status::DownPartial,
            other => Status::Other(other),
        }
    }

    pub fn raw(&self) -> u32 {
        match self {
            Status::Unknown => 1,
            Status::Scanning => 2,
            Status::Up => 3,
            Status::Warning => 4,
            Status::Down => 5,
            Status::NoProbe => 6,
            Status::PausedByUser => 7,
            Status::PausedByDependency => 8,
            Status::PausedBySchedule => 9,
            Status::Unusual => 10,
            Status::NotLicensed => 11,
            Status::PausedUntil => 12,
            Status::DownAcknowledged => 13,
            Status::DownPartial => 14,
            Status::Other(raw) => *raw,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            Status::PausedByUser
                | Status::PausedByDependency
                | Status::PausedBySchedule
                | Status::PausedUntil
        )
    }

    pub fn is_down(&self) -> bool {
        matches!(
            self,
            Status::Down | Status::DownAcknowledged | Status::DownPartial
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unknown => write!(f, "Unknown"),
            Status::Scanning => write!(f, "Scanning"),
            Status::Up => write!(f, "Up"),
            Status::Warning => write!(f, "Warning"),
            Status::Down => write!(f, "Down"),
            Status::NoProbe => write!(f, "No Probe"),
            Status::PausedByUser => write!(f, "Paused by User"),
            Status::PausedByDependency => write!(f, "Paused by Dependency"),
            Status::PausedBySchedule => write!(f, "Paused by Schedule"),
            Status::Unusual => write!(f, "Unusual"),
            Status::NotLicensed => write!(f, "Not Licensed"),
            Status::PausedUntil => write!(f, "Paused Until"),
            Status::DownAcknowledged => write!(f, "Down Acknowledged"),
            Status::DownPartial => write!(f, "Down Partial"),
            Status::Other(raw) => write!(f, "Status {}", raw),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = crate::PrtgError;

    fn from_str(input: &str) -> crate::Result<Self> {
        input
            .trim()
            .parse::<u32>()
            .map(Status::from_raw)
            .map_err(|_| crate::PrtgError::ParserError(format!("Cannot convert {:?} to Status", input)))
    }
}
