//! # FFTA data server
//!
//! HTTP front end for the game data tables managed by `ffta-core`.
//!
//! | Method | Path                    | Success                 |
//! |--------|-------------------------|-------------------------|
//! | GET    | `/api/{entity}`         | 200, array of records   |
//! | POST   | `/api/{entity}`         | 201, message            |
//! | GET    | `/api/{entity}/{index}` | 200, one record         |
//! | PUT    | `/api/{entity}/{index}` | 200, message            |
//! | DELETE | `/api/{entity}/{index}` | 200, message            |
//!
//! `GET /api/jobs` accepts `race` and `ability`; `GET /api/abilities`
//! accepts `race`, `job` and `ability`. Failures answer with
//! `{"error": "..."}`: 404 for unknown entities or rows, 400 for malformed
//! input, 500 for storage problems.

mod config;
mod error;
mod handlers;
mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use handlers::{router, AppState, Message};
pub use server::run;
