use crate::calibration::AxisRanges;
use crate::event::{Axis, FieldCode, RawFieldUpdate};
use std::collections::HashMap;

/// Partially filled touch point of one slot. Devices only report fields that
/// changed, so the record outlives drain cycles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub pressure: Option<f64>,
    pub size_w: Option<f64>,
    pub size_h: Option<f64>,
    pub id: Option<i32>,
    pub delete: bool,
}

pub struct SlotAssembler {
    ranges: AxisRanges,
    slot: i32,
    points: HashMap<i32, PendingPoint>,
    // Slots updated in the current cycle, least recently updated first.
    touched: Vec<i32>,
    // Contacts replaced by a new tracking id before the cycle ended.
    retired: Vec<PendingPoint>,
}

impl SlotAssembler {
    pub fn new(ranges: AxisRanges) -> Self {
        SlotAssembler {
            ranges,
            slot: 0,
            points: HashMap::new(),
            touched: Vec::new(),
            retired: Vec::new(),
        }
    }

    pub fn current_slot(&self) -> i32 {
        self.slot
    }

    pub fn pending(&self, slot: i32) -> Option<&PendingPoint> {
        self.points.get(&slot)
    }

    pub fn feed(&mut self, update: RawFieldUpdate) {
        let RawFieldUpdate { code, value } = update;

        match code {
            FieldCode::Slot => {
                self.slot = value;
                return;
            }
            FieldCode::TrackingId => {
                let point = self.points.entry(self.slot).or_default();
                if value < 0 {
                    point.delete = true;
                } else {
                    if let Some(old) = point.id {
                        if old != value || point.delete {
                            let mut retired = point.clone();
                            retired.delete = true;
                            self.retired.push(retired);
                        }
                    }
                    point.delete = false;
                    point.id = Some(value);
                }
            }
            code => {
                let axis = match code.axis() {
                    Some(axis) => axis,
                    None => return,
                };
                // Axes without a valid calibration are dropped.
                let normalized = match self.ranges.normalize(axis, value) {
                    Some(normalized) => normalized,
                    None => return,
                };

                let point = self.points.entry(self.slot).or_default();
                let field = match axis {
                    Axis::PositionX => &mut point.x,
                    Axis::PositionY => &mut point.y,
                    Axis::Pressure => &mut point.pressure,
                    Axis::TouchMajor => &mut point.size_w,
                    Axis::TouchMinor => &mut point.size_h,
                };
                *field = Some(normalized);
            }
        }

        self.mark_touched(self.slot);
    }

    fn mark_touched(&mut self, slot: i32) {
        if let Some(index) = self.touched.iter().position(|&touched| touched == slot) {
            self.touched.remove(index);
        }
        self.touched.push(slot);
    }

    /// Ends a drain cycle: returns snapshots of the points touched since the
    /// previous call, skipping those that have no tracking id yet.
    pub fn take_changes(&mut self) -> Vec<PendingPoint> {
        let mut changes = std::mem::take(&mut self.retired);

        for slot in self.touched.drain(..) {
            let point = match self.points.get_mut(&slot) {
                Some(point) => point,
                None => continue,
            };

            if point.id.is_none() {
                log::debug!("Slot {} has no tracking id yet, holding it back", slot);
                point.delete = false;
                continue;
            }

            changes.push(point.clone());

            if point.delete {
                point.delete = false;
                point.id = None;
            }
        }

        changes
    }
}
