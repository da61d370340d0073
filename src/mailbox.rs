/*
 * A blocking many:1 queue: VecDeque behind a mutex + a condvar to wait for items.
 * On top of the poor-man's channel it can be closed:
 * - a closed mailbox drops new messages on the floor
 * - receivers drain whatever is left, then get None
 * That's how the arbiter's threads learn it's time to go home.
 */

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

struct Slots<Y> {
    queue: VecDeque<Y>,
    closed: bool,
}

pub struct Mailbox<Y> {
    slots: Mutex<Slots<Y>>,
    item_ready: Condvar,
}

impl<Y> Mailbox<Y> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                queue: VecDeque::new(),
                closed: false,
            }),
            item_ready: Condvar::new(),
        }
    }

    /// push message to the end of the queue, false if the mailbox is closed
    pub fn send(&self, message: Y) -> bool {
        let mut slots = self.slots.lock();
        if slots.closed {
            return false;
        }
        slots.queue.push_back(message);
        drop(slots);
        self.item_ready.notify_one();
        true
    }

    /// take one message from the queue, None once it's closed and empty
    pub fn receive(&self) -> Option<Y> {
        let mut slots = self.slots.lock();
        loop {
            if let Some(message) = slots.queue.pop_front() {
                return Some(message);
            }
            if slots.closed {
                return None;
            }
            self.item_ready.wait(&mut slots);
        }
    }

    /// wake all the receivers to let them see the end
    pub fn close(&self) {
        self.slots.lock().closed = true;
        self.item_ready.notify_all();
    }
}

impl<Y> Default for Mailbox<Y> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use std::{
        thread::{scope, sleep},
        time::Duration,
    };

    use super::*;

    #[test]
    fn test_fifo() {
        let mailbox = Mailbox::new();
        scope(|s| {
            s.spawn(|| {
                for i in 0..100 {
                    assert!(mailbox.send(i));
                }
            });
            for i in 0..100 {
                assert_eq!(Some(i), mailbox.receive());
            }
        });
    }

    #[test]
    fn test_close_drains_first() {
        let mailbox = Mailbox::new();
        mailbox.send("left over");
        mailbox.close();
        assert!(!mailbox.send("too late"));
        assert_eq!(Some("left over"), mailbox.receive());
        assert_eq!(None, mailbox.receive());
    }

    #[test]
    fn test_close_wakes_waiting_receivers() {
        let mailbox: Mailbox<()> = Mailbox::new();
        scope(|s| {
            let receivers: Vec<_> = (0..3).map(|_| s.spawn(|| mailbox.receive())).collect();
            // let the receivers park on the condvar
            sleep(Duration::from_millis(50));
            mailbox.close();
            for r in receivers {
                assert_eq!(None, r.join().unwrap());
            }
        });
    }
}
