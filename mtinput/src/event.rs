use std::collections::BTreeSet;
use std::fmt;

/// Field codes the device layer reports for a multitouch slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldCode {
    PositionX,
    PositionY,
    Pressure,
    TouchMajor,
    TouchMinor,
    TrackingId,
    Slot,
}

impl FieldCode {
    /// The calibrated axis carried by this code, if any.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            FieldCode::PositionX => Some(Axis::PositionX),
            FieldCode::PositionY => Some(Axis::PositionY),
            FieldCode::Pressure => Some(Axis::Pressure),
            FieldCode::TouchMajor => Some(Axis::TouchMajor),
            FieldCode::TouchMinor => Some(Axis::TouchMinor),
            FieldCode::TrackingId | FieldCode::Slot => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFieldUpdate {
    pub code: FieldCode,
    pub value: i32,
}

impl RawFieldUpdate {
    pub fn new(code: FieldCode, value: i32) -> Self {
        RawFieldUpdate { code, value }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    PositionX,
    PositionY,
    Pressure,
    TouchMajor,
    TouchMinor,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::PositionX,
        Axis::PositionY,
        Axis::Pressure,
        Axis::TouchMajor,
        Axis::TouchMinor,
    ];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::PositionX => "position X",
            Axis::PositionY => "position Y",
            Axis::Pressure => "pressure",
            Axis::TouchMajor => "touch major",
            Axis::TouchMinor => "touch minor",
        };
        f.pad(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Down, // The contact started.
    Move, // The contact changed.
    Up,   // The contact was lifted.
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Down => "down",
            Action::Move => "move",
            Action::Up => "up",
        };
        f.pad(name)
    }
}

/// Attribute kinds a touch carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Profile {
    Position,
    Shape,
    Pressure,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Touch {
    pub id: i32,
    pub device: String,
    pub position: (f64, f64),
    pub pressure: Option<f64>,
    pub shape: Option<Shape>,
    pub profile: BTreeSet<Profile>,
}

impl fmt::Display for Touch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Touch id={} pos=({:.6}, {:.6}) device={}>",
            self.id, self.position.0, self.position.1, self.device
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub action: Action,
    pub touch: Touch,
}
