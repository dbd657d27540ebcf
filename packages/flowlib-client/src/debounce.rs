use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::QueryController;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces rapid query edits: a value is forwarded once no newer one arrived within the delay.
#[derive(Debug)]
pub struct QueryDebouncer {
	sender: mpsc::UnboundedSender<String>,
	task: JoinHandle<()>,
}
impl QueryDebouncer {
	pub fn new<F>(delay: Duration, forward: F) -> Self
	where
		F: Fn(String) + Send + 'static,
	{
		let (sender, mut receiver) = mpsc::unbounded_channel::<String>();
		let task = tokio::spawn(async move {
			while let Some(mut pending) = receiver.recv().await {
				loop {
					tokio::select! {
						next = receiver.recv() => match next {
							Some(value) => pending = value,
							None => break,
						},
						_ = tokio::time::sleep(delay) => break,
					}
				}

				forward(pending);
			}
		});

		Self { sender, task }
	}

	/// A debouncer feeding `controller.set_query`.
	pub fn for_controller(controller: QueryController, delay: Duration) -> Self {
		Self::new(delay, move |query| {
			controller.set_query(query);
		})
	}

	pub fn push(&self, value: impl Into<String>) {
		if self.sender.send(value.into()).is_err() {
			tracing::debug!("Query debouncer already stopped.");
		}
	}

	/// Forwards any pending value immediately and stops the debouncer.
	pub async fn flush(self) {
		drop(self.sender);

		if let Err(err) = self.task.await {
			tracing::warn!(error = %err, "Query debouncer task failed.");
		}
	}
}
