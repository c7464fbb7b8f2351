//! Event bus for membership notifications.
//!
//! This module provides a broadcast-based event bus so that surrounding
//! systems (indexers, audit logs, alerting) can observe membership changes
//! and rejected updates without being called by the instance directly.

use permset_types::PermissionEvent;
use tokio::sync::broadcast;

/// Event bus for broadcasting permission events to multiple subscribers.
pub struct EventBus {
	/// The broadcast sender used to publish events.
	sender: broadcast::Sender<PermissionEvent>,
}

impl EventBus {
	/// Creates a new EventBus with the specified channel capacity.
	///
	/// The capacity determines how many events can be buffered before
	/// lagging subscribers start missing the oldest ones.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Creates a new subscriber that receives every event published after
	/// this call.
	pub fn subscribe(&self) -> broadcast::Receiver<PermissionEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns an error if there are no active subscribers.
	pub fn publish(
		&self,
		event: PermissionEvent,
	) -> Result<(), broadcast::error::SendError<PermissionEvent>> {
		self.sender.send(event)?;
		Ok(())
	}

	/// Number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}
}

/// Cloning an EventBus creates a new handle to the same channel.
impl Clone for EventBus {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("subscribers", &self.sender.receiver_count())
			.finish()
	}
}
