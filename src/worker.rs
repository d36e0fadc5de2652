//! Background search thread.
//!
//! An [`EngineWorker`] owns an [`Engine`] on its own thread so a UI thread
//! never blocks on a search. Every request carries a correlation id and only
//! the response to the latest request is handed back; answers to superseded
//! requests are dropped on arrival.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::ai::{Engine, Tier};
use crate::config::EngineConfig;
use crate::game::{Board, Player};

/// Search request sent to the worker thread.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
    pub id: u64,
    pub board: Board,
    pub player: Player,
    pub tier: Tier,
}

/// Reply to a [`SearchRequest`] with the same id. `column` is `None` when the
/// engine rejected the board.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
    pub id: u64,
    pub column: Option<usize>,
}

enum WorkerCommand {
    Search(SearchRequest),
    NewGame,
}

pub struct EngineWorker {
    commands: Option<mpsc::Sender<WorkerCommand>>,
    responses: mpsc::Receiver<SearchResponse>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
    latest: Option<u64>,
}

impl EngineWorker {
    pub fn spawn(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, resp_rx) = mpsc::channel::<SearchResponse>();

        let handle = std::thread::spawn(move || {
            let mut engine = Engine::new(config);
            for command in cmd_rx {
                match command {
                    WorkerCommand::Search(request) => {
                        let column =
                            match engine.select_move(&request.board, request.player, request.tier) {
                                Ok(col) => Some(col),
                                Err(e) => {
                                    log::warn!("request {} rejected: {e}", request.id);
                                    None
                                }
                            };
                        if resp_tx
                            .send(SearchResponse {
                                id: request.id,
                                column,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                    WorkerCommand::NewGame => engine.new_game(),
                }
            }
            log::debug!("engine worker stopped");
        });

        EngineWorker {
            commands: Some(cmd_tx),
            responses: resp_rx,
            handle: Some(handle),
            next_id: 0,
            latest: None,
        }
    }

    /// Queue a search and return its id. Any earlier request still in
    /// flight is superseded.
    pub fn submit(&mut self, board: Board, player: Player, tier: Tier) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.latest = Some(id);
        self.send(WorkerCommand::Search(SearchRequest {
            id,
            board,
            player,
            tier,
        }));
        id
    }

    /// Clear the engine's per-game state. Pending requests are superseded.
    pub fn new_game(&mut self) {
        self.latest = None;
        self.send(WorkerCommand::NewGame);
    }

    /// Response to the latest request, if it has arrived.
    pub fn try_recv(&mut self) -> Option<SearchResponse> {
        while let Ok(response) = self.responses.try_recv() {
            if let Some(response) = self.accept(response) {
                return Some(response);
            }
        }
        None
    }

    /// Wait up to `timeout` for the response to the latest request.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<SearchResponse> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(response) => {
                    if let Some(response) = self.accept(response) {
                        return Some(response);
                    }
                }
                Err(_) => return None,
            }
        }
    }

    fn accept(&mut self, response: SearchResponse) -> Option<SearchResponse> {
        if self.latest == Some(response.id) {
            self.latest = None;
            Some(response)
        } else {
            log::trace!("discarding stale response {}", response.id);
            None
        }
    }

    fn send(&self, command: WorkerCommand) {
        if let Some(tx) = &self.commands {
            if tx.send(command).is_err() {
                log::error!("engine worker thread has exited");
            }
        }
    }
}

impl Drop for EngineWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.commands.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
