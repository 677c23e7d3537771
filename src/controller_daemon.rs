use crate::controller::AutocompleteController;
use crate::surface::{InputSurface, OutputSurface, UiEvent};
use log::{debug, info};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

pub enum DaemonMessage {
    Event(UiEvent),
    ReplaceVocabulary(Vec<String>),
    Shutdown,
}

/// Owns one controller and feeds it host events, firing the debounce deadline in between.
pub struct ControllerDaemon<I, O> {
    controller: AutocompleteController<I, O>,
    receiver: mpsc::Receiver<DaemonMessage>,
}

impl<I: InputSurface, O: OutputSurface> ControllerDaemon<I, O> {
    pub fn new(
        controller: AutocompleteController<I, O>,
        receiver: mpsc::Receiver<DaemonMessage>,
    ) -> Self {
        Self { controller, receiver }
    }

    pub async fn run(mut self) -> AutocompleteController<I, O> {
        loop {
            let deadline = self.controller.next_deadline();
            tokio::select! {
                message = self.receiver.recv() => {
                    match message {
                        Some(DaemonMessage::Event(event)) => {
                            self.controller.handle_event(event, Instant::now());
                        }
                        Some(DaemonMessage::ReplaceVocabulary(words)) => {
                            info!("replacing vocabulary with {} products", words.len());
                            self.controller.replace_vocabulary(words);
                        }
                        Some(DaemonMessage::Shutdown) => {
                            self.controller.dismiss();
                            break;
                        }
                        None => {
                            // Hosts gone: let a query that is already due still land.
                            if let Some(deadline) = self.controller.next_deadline() {
                                sleep_until(deadline).await;
                                self.controller.poll(Instant::now());
                            }
                            break;
                        }
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.controller.poll(Instant::now()) {
                        debug!("debounced query ran");
                    }
                }
            }
        }
        self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerBuilder, Phase};
    use crate::editor::TextInput;
    use crate::palette::SuggestionList;
    use crate::surface::{Key, TextEdit};
    use std::time::Duration;

    fn spawn_daemon() -> (
        mpsc::Sender<DaemonMessage>,
        tokio::task::JoinHandle<AutocompleteController<TextInput, SuggestionList>>,
    ) {
        let controller = ControllerBuilder::new()
            .input(TextInput::new())
            .output(SuggestionList::new())
            .vocabulary(["MARTILLO DE UÑA", "MANGUERA DE JARDÍN", "MANIJA"])
            .build()
            .unwrap();
        let (tx, rx) = mpsc::channel(32);
        let handle = tokio::spawn(ControllerDaemon::new(controller, rx).run());
        (tx, handle)
    }

    async fn send(tx: &mpsc::Sender<DaemonMessage>, event: UiEvent) {
        tx.send(DaemonMessage::Event(event)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn fast_typing_produces_one_query() {
        let (tx, handle) = spawn_daemon();
        for ch in "MANI".chars() {
            send(&tx, UiEvent::Edit(TextEdit::Insert(ch))).await;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
        send(&tx, UiEvent::Key(Key::ArrowDown)).await;
        send(&tx, UiEvent::Key(Key::Enter)).await;
        drop(tx);

        let controller = handle.await.unwrap();
        assert_eq!(controller.queries_executed(), 1);
        assert_eq!(controller.input().value(), "MANIJA");
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_channel_flushes_a_pending_query() {
        let (tx, handle) = spawn_daemon();
        send(&tx, UiEvent::Edit(TextEdit::Replace("man".into()))).await;
        drop(tx);

        let controller = handle.await.unwrap();
        assert_eq!(controller.queries_executed(), 1);
        assert_eq!(controller.output().values(), vec!["MANIJA", "MANGUERA DE JARDÍN"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_the_pending_query() {
        let (tx, handle) = spawn_daemon();
        send(&tx, UiEvent::Edit(TextEdit::Replace("man".into()))).await;
        tx.send(DaemonMessage::Shutdown).await.unwrap();

        let controller = handle.await.unwrap();
        assert_eq!(controller.queries_executed(), 0);
        assert_eq!(controller.next_deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn vocabulary_can_be_swapped_at_runtime() {
        let (tx, handle) = spawn_daemon();
        tx.send(DaemonMessage::ReplaceVocabulary(vec!["MACHETE".into()]))
            .await
            .unwrap();
        send(&tx, UiEvent::Edit(TextEdit::Replace("ma".into()))).await;
        drop(tx);

        let controller = handle.await.unwrap();
        assert_eq!(controller.output().values(), vec!["MACHETE"]);
    }
}
