use parking_lot::{Condvar, Mutex};

/// Blocks waiters until `signal` has been called `count` times.
///
pub struct CountdownEvent {
    count: Mutex<usize>,
    condvar: Condvar,
}

impl CountdownEvent {
    // Create a new CountdownEvent with initial count.
    //
    pub fn new(count: usize) -> Self {
        CountdownEvent {
            count: Mutex::new(count),
            condvar: Condvar::new(),
        }
    }

    // Signal the event, decrementing count by one.
    // Returns true for the signal that released the waiters.
    //
    pub fn signal(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        if *count == 0 {
            self.condvar.notify_all();
            true
        } else {
            false
        }
    }

    // Wait until count reaches zero.
    //
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.condvar.wait(&mut count);
        }
    }

    pub fn is_set(&self) -> bool {
        *self.count.lock() == 0
    }
}
