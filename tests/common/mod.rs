/// Shared helpers for integration tests
use xiangqi::{fen, Pieces};

pub fn enable_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn pieces(position: &str) -> Pieces {
    fen::decode(position).expect("test position must parse")
}
