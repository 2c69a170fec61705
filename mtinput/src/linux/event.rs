use crate::event::{Axis, FieldCode, RawFieldUpdate};
use evdev::{AbsoluteAxisCode, EventType, InputEvent};

impl RawFieldUpdate {
    pub(crate) fn from_event(event: &InputEvent) -> Option<Self> {
        Self::from_parts(event.event_type(), event.code(), event.value())
    }

    fn from_parts(type_: EventType, code: u16, value: i32) -> Option<Self> {
        if type_ != EventType::ABSOLUTE {
            return None;
        }

        let code = FieldCode::from_raw(AbsoluteAxisCode(code))?;
        Some(RawFieldUpdate { code, value })
    }
}

impl FieldCode {
    pub(crate) fn from_raw(code: AbsoluteAxisCode) -> Option<FieldCode> {
        let code = match code {
            AbsoluteAxisCode::ABS_MT_SLOT => FieldCode::Slot,
            AbsoluteAxisCode::ABS_MT_TOUCH_MAJOR => FieldCode::TouchMajor,
            AbsoluteAxisCode::ABS_MT_TOUCH_MINOR => FieldCode::TouchMinor,
            AbsoluteAxisCode::ABS_MT_POSITION_X => FieldCode::PositionX,
            AbsoluteAxisCode::ABS_MT_POSITION_Y => FieldCode::PositionY,
            AbsoluteAxisCode::ABS_MT_TRACKING_ID => FieldCode::TrackingId,
            AbsoluteAxisCode::ABS_MT_PRESSURE => FieldCode::Pressure,
            _ => return None,
        };

        Some(code)
    }
}

impl Axis {
    pub(crate) fn from_raw(code: AbsoluteAxisCode) -> Option<Axis> {
        FieldCode::from_raw(code)?.axis()
    }
}
