use crate::event::{Action, Touch, TouchEvent};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

pub fn event_queue() -> (EventSender, EventReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        EventSender { sender },
        EventReceiver {
            receiver,
            closed: false,
        },
    )
}

/// Producer half, owned by the capture thread.
#[derive(Clone)]
pub struct EventSender {
    sender: UnboundedSender<TouchEvent>,
}

impl EventSender {
    /// Returns false once the consumer is gone.
    pub fn push(&self, event: TouchEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Consumer half. Never blocks.
pub struct EventReceiver {
    receiver: UnboundedReceiver<TouchEvent>,
    closed: bool,
}

impl EventReceiver {
    /// Dispatches every queued event, oldest first, and returns how many were
    /// dispatched. An empty queue simply ends the call.
    pub fn drain<F>(&mut self, mut dispatch: F) -> usize
    where
        F: FnMut(Action, Touch),
    {
        let mut count = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(TouchEvent { action, touch }) => {
                    dispatch(action, touch);
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }

        count
    }

    /// True once every producer is gone and the queue ran dry.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
