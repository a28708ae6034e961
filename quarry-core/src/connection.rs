use crate::{Executor, Result};

pub trait Connection: Executor {
    /// Open a connection to the store at `url`.
    fn connect(url: &str) -> Result<Self>;
}
