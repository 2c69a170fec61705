use crate::assembler::PendingPoint;
use crate::event::{Action, Profile, Shape, Touch, TouchEvent};
use std::collections::{BTreeSet, HashMap};

/// Turns assembled points into down/move/up transitions.
pub struct TouchLifecycleTracker {
    device: String,
    live: HashMap<i32, Touch>,
}

impl TouchLifecycleTracker {
    pub fn new(device: impl Into<String>) -> Self {
        TouchLifecycleTracker {
            device: device.into(),
            live: HashMap::new(),
        }
    }

    pub fn is_live(&self, id: i32) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn classify(&mut self, point: &mut PendingPoint) -> Option<TouchEvent> {
        let id = point.id?;

        if point.delete {
            point.delete = false;

            let mut touch = match self.live.remove(&id) {
                Some(touch) => touch,
                // Never reported down, so there is nothing to lift.
                None => return None,
            };
            apply(&mut touch, point);
            return Some(TouchEvent {
                action: Action::Up,
                touch,
            });
        }

        match self.live.get_mut(&id) {
            Some(touch) => {
                apply(touch, point);
                Some(TouchEvent {
                    action: Action::Move,
                    touch: touch.clone(),
                })
            }
            None => {
                let mut touch = Touch {
                    id,
                    device: self.device.clone(),
                    position: (0.0, 0.0),
                    pressure: None,
                    shape: None,
                    profile: BTreeSet::new(),
                };
                apply(&mut touch, point);
                self.live.insert(id, touch.clone());
                Some(TouchEvent {
                    action: Action::Down,
                    touch,
                })
            }
        }
    }
}

// Updates the mutable attributes of `touch`. Identity is left alone.
fn apply(touch: &mut Touch, point: &PendingPoint) {
    if let Some(x) = point.x {
        touch.position.0 = x;
    }
    if let Some(y) = point.y {
        touch.position.1 = y;
    }
    touch.profile.insert(Profile::Position);

    if let (Some(width), Some(height)) = (point.size_w, point.size_h) {
        touch.shape = Some(Shape { width, height });
        touch.profile.insert(Profile::Shape);
    }

    if let Some(pressure) = point.pressure {
        touch.pressure = Some(pressure);
        touch.profile.insert(Profile::Pressure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: i32, x: f64, y: f64) -> PendingPoint {
        PendingPoint {
            x: Some(x),
            y: Some(y),
            id: Some(id),
            ..Default::default()
        }
    }

    #[test]
    fn down_move_up() {
        let mut tracker = TouchLifecycleTracker::new("touchscreen");

        let event = tracker.classify(&mut point(5, 0.5, 0.5)).unwrap();
        assert_eq!(event.action, Action::Down);
        assert_eq!(event.touch.id, 5);
        assert_eq!(event.touch.device, "touchscreen");
        assert_eq!(event.touch.position, (0.5, 0.5));
        assert!(tracker.is_live(5));

        let event = tracker.classify(&mut point(5, 0.6, 0.4)).unwrap();
        assert_eq!(event.action, Action::Move);
        assert_eq!(event.touch.position, (0.6, 0.4));

        let mut lifted = point(5, 0.6, 0.4);
        lifted.delete = true;
        let event = tracker.classify(&mut lifted).unwrap();
        assert_eq!(event.action, Action::Up);
        assert_eq!(event.touch.id, 5);
        assert!(!lifted.delete);
        assert!(!tracker.is_live(5));

        let event = tracker.classify(&mut point(5, 0.1, 0.1)).unwrap();
        assert_eq!(event.action, Action::Down);
    }

    #[test]
    fn no_double_down() {
        let mut tracker = TouchLifecycleTracker::new("touchscreen");
        let mut actions = Vec::new();
        for _ in 0..3 {
            actions.push(tracker.classify(&mut point(9, 0.2, 0.2)).unwrap().action);
        }
        assert_eq!(actions, vec![Action::Down, Action::Move, Action::Move]);
        assert_eq!(tracker.live_count(), 1);
    }

    #[test]
    fn point_without_id() {
        let mut tracker = TouchLifecycleTracker::new("touchscreen");
        let mut point = PendingPoint {
            x: Some(0.3),
            ..Default::default()
        };
        assert!(tracker.classify(&mut point).is_none());
        assert_eq!(tracker.live_count(), 0);
    }

    #[test]
    fn lift_of_unknown_id_is_dropped() {
        let mut tracker = TouchLifecycleTracker::new("touchscreen");
        let mut lifted = point(3, 0.0, 0.0);
        lifted.delete = true;
        assert!(tracker.classify(&mut lifted).is_none());
        assert!(!lifted.delete);
    }

    #[test]
    fn profile_follows_available_fields() {
        let mut tracker = TouchLifecycleTracker::new("touchscreen");

        let mut first = point(1, 0.5, 0.5);
        first.size_w = Some(0.1);
        let event = tracker.classify(&mut first).unwrap();
        assert_eq!(event.touch.shape, None);
        assert_eq!(event.touch.profile, [Profile::Position].into_iter().collect::<BTreeSet<_>>());

        let mut second = point(1, 0.5, 0.5);
        second.size_w = Some(0.1);
        second.size_h = Some(0.2);
        second.pressure = Some(0.7);
        let event = tracker.classify(&mut second).unwrap();
        assert_eq!(event.touch.shape, Some(Shape { width: 0.1, height: 0.2 }));
        assert_eq!(event.touch.pressure, Some(0.7));
        assert_eq!(
            event.touch.profile,
            [Profile::Position, Profile::Shape, Profile::Pressure]
                .into_iter()
                .collect::<BTreeSet<_>>()
        );
    }
}
