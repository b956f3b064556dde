// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Manages a generic, thread-safe event channel.
///
/// The bus owns both ends of an unbounded `flume` channel. Producers get
/// clones of the sender, the owner drains the receiver, either blocking or
/// with `recv_async` from inside a task.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a new EventBus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::trace!("EventBus initialized.");
        Self { sender, receiver }
    }

    /// Attempts to send an event, logging an error if the receiver is disconnected.
    pub fn publish(&self, event: T) {
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to send event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Takes every event currently queued without waiting.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ProgressEvent;
    use flume::TryRecvError;
    use std::{thread, time::Duration};

    fn progress(name: &str, fraction: f64) -> ProgressEvent {
        ProgressEvent {
            name: name.to_string(),
            fraction,
        }
    }

    #[test]
    fn event_bus_creation() {
        let bus = EventBus::<ProgressEvent>::new();
        assert!(bus.receiver().is_empty());
    }

    #[test]
    fn preserves_order_from_one_sender() {
        let bus = EventBus::<ProgressEvent>::new();
        let sender = bus.sender();

        for fraction in [0.25, 0.5, 1.0] {
            sender.send(progress("data", fraction)).expect("Send should succeed");
        }

        let received: Vec<f64> = bus.drain().into_iter().map(|e| e.fraction).collect();
        assert_eq!(received, vec![0.25, 0.5, 1.0]);
        assert_eq!(bus.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn publish_then_receive() {
        let bus = EventBus::<ProgressEvent>::new();
        bus.publish(progress("code", 0.5));

        let event = bus
            .receiver()
            .recv_timeout(Duration::from_millis(100))
            .expect("event should arrive");
        assert_eq!(event, progress("code", 0.5));
    }

    #[test]
    fn send_from_thread() {
        let bus = EventBus::<ProgressEvent>::new();
        let sender = bus.sender();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender
                .send(progress("framework", 1.0))
                .expect("Send from thread failed");
        });

        match bus.receiver().recv_timeout(Duration::from_secs(1)) {
            Ok(event) => assert_eq!(event, progress("framework", 1.0)),
            Err(e) => panic!("Failed to receive event from thread: {e:?}"),
        }

        handle.join().expect("Thread join failed");
    }
}
