use std::sync::Arc;

use tokio::sync::Semaphore;

use assessor::Assessor;

#[derive(Clone)]
pub struct HandlerState {
    pub assessor: Arc<Assessor>,

    /// Bounds how many assessments run on the blocking pool at once.
    pub limiter: Arc<Semaphore>,

    pub max_concurrent: usize,
}

impl HandlerState {
    pub fn new(assessor: Arc<Assessor>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            assessor,
            limiter: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }
}
