//! Game-day record, line-up, substitution, and set-point types.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    player::Player,
    types::{GameDayId, PlayerId, Position, Session, SetNumber},
};

/// Playing-time value of one full set.
pub const SET_POINTS: f64 = 25.0;
/// Players a set line-up can hold.
pub const SET_CAPACITY: usize = 6;
/// Minimum Saturday attendance for a game day to complete.
pub const MIN_SATURDAY_ATTENDANCE: usize = 6;

/// Raised when a set-point string does not parse into `[0, 25]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPointParseError(pub String);

impl fmt::Display for SetPointParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid set point: {:?}", self.0)
    }
}

/// Fractional point inside a 25-point set, written with an apostrophe
/// decimal separator (`"12'5"` is point 12.5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SetPoint(f64);

impl SetPoint {
    /// Parses the apostrophe decimal format, accepting values in `[0, 25]`.
    pub fn parse(raw: &str) -> Result<Self, SetPointParseError> {
        let normalized = raw.trim().replace('\'', ".");
        let value: f64 = normalized
            .parse()
            .map_err(|_| SetPointParseError(raw.to_string()))?;
        if !value.is_finite() || !(0.0..=SET_POINTS).contains(&value) {
            return Err(SetPointParseError(raw.to_string()));
        }
        Ok(Self(value))
    }

    /// Point value inside the set.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Splits the set's 25 points between the outgoing and incoming player.
    pub fn split(self) -> PointSplit {
        PointSplit {
            outgoing: self.0,
            incoming: SET_POINTS - self.0,
        }
    }
}

impl fmt::Display for SetPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        write!(f, "{}", text.replace('.', "'"))
    }
}

impl TryFrom<String> for SetPoint {
    type Error = SetPointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SetPoint> for String {
    fn from(value: SetPoint) -> Self {
        value.to_string()
    }
}

/// Outgoing and incoming shares of one set's 25 points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSplit {
    /// Points earned by the starter leaving the court.
    pub outgoing: f64,
    /// Points earned by the substitute coming in.
    pub incoming: f64,
}

/// One substitution inside a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    /// Starter leaving the court.
    pub outgoing: PlayerId,
    /// Substitute coming in.
    pub incoming: PlayerId,
    /// Point in the set at which the swap happened.
    pub set_point: SetPoint,
}

/// Player identity captured when the line-up was planned.
///
/// Later roster edits do not rewrite historical line-ups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    /// Roster id of the planned player.
    pub player_id: PlayerId,
    /// Name at planning time.
    pub name: String,
    /// Jersey at planning time.
    pub jersey: u8,
    /// Role at planning time.
    pub position: Position,
}

impl LineupEntry {
    /// Captures the planning-time copy of `player`.
    pub fn capture(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            jersey: player.jersey,
            position: player.position,
        }
    }
}

/// The two ordered six-player sets planned for Saturday.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lineup {
    /// First set membership.
    pub set1: Vec<LineupEntry>,
    /// Second set membership.
    pub set2: Vec<LineupEntry>,
}

impl Lineup {
    /// Members of one set.
    pub fn set(&self, set: SetNumber) -> &[LineupEntry] {
        match set {
            SetNumber::One => &self.set1,
            SetNumber::Two => &self.set2,
        }
    }

    /// Mutable members of one set.
    pub fn set_mut(&mut self, set: SetNumber) -> &mut Vec<LineupEntry> {
        match set {
            SetNumber::One => &mut self.set1,
            SetNumber::Two => &mut self.set2,
        }
    }

    /// Returns true when `player` is a member of `set`.
    pub fn contains(&self, set: SetNumber, player: PlayerId) -> bool {
        self.set(set).iter().any(|e| e.player_id == player)
    }

    /// Returns true when neither set has members.
    pub fn is_empty(&self) -> bool {
        self.set1.is_empty() && self.set2.is_empty()
    }
}

/// Per-set substitution ledgers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Substitutions {
    /// First-set ledger.
    pub set1: Vec<Substitution>,
    /// Second-set ledger.
    pub set2: Vec<Substitution>,
}

impl Substitutions {
    /// Ledger of one set.
    pub fn set(&self, set: SetNumber) -> &[Substitution] {
        match set {
            SetNumber::One => &self.set1,
            SetNumber::Two => &self.set2,
        }
    }

    /// Mutable ledger of one set.
    pub fn set_mut(&mut self, set: SetNumber) -> &mut Vec<Substitution> {
        match set {
            SetNumber::One => &mut self.set1,
            SetNumber::Two => &mut self.set2,
        }
    }
}

/// One tracked week: two training sessions plus the Saturday match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDay {
    /// Stable game-day identifier.
    pub id: GameDayId,
    /// Monday anchoring the tracked week.
    pub monday: NaiveDate,
    /// Players present at Monday training.
    pub monday_attendance: Vec<PlayerId>,
    /// Players present at Wednesday training.
    pub wednesday_attendance: Vec<PlayerId>,
    /// Players present for the Saturday match.
    pub saturday_attendance: Vec<PlayerId>,
    /// Planned line-up for both sets.
    pub lineup: Lineup,
    /// Recorded substitutions for both sets.
    pub substitutions: Substitutions,
    /// True once the Saturday match is locked and counted.
    pub completed: bool,
    /// Creation timestamp in milliseconds since epoch.
    pub created_ts_ms: u64,
}

impl GameDay {
    /// Creates an empty draft for the week anchored at `monday`.
    pub fn new(id: GameDayId, monday: NaiveDate, created_ts_ms: u64) -> Self {
        Self {
            id,
            monday,
            monday_attendance: Vec::new(),
            wednesday_attendance: Vec::new(),
            saturday_attendance: Vec::new(),
            lineup: Lineup::default(),
            substitutions: Substitutions::default(),
            completed: false,
            created_ts_ms,
        }
    }

    /// Attendance list of one session.
    pub fn attendance(&self, session: Session) -> &[PlayerId] {
        match session {
            Session::Monday => &self.monday_attendance,
            Session::Wednesday => &self.wednesday_attendance,
            Session::Saturday => &self.saturday_attendance,
        }
    }

    /// Mutable attendance list of one session.
    pub fn attendance_mut(&mut self, session: Session) -> &mut Vec<PlayerId> {
        match session {
            Session::Monday => &mut self.monday_attendance,
            Session::Wednesday => &mut self.wednesday_attendance,
            Session::Saturday => &mut self.saturday_attendance,
        }
    }

    /// Returns true when `player` attends `session`.
    pub fn attends(&self, session: Session, player: PlayerId) -> bool {
        self.attendance(session).contains(&player)
    }
}

/// Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
