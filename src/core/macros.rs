/// Runs a request body on the driver's thread pool, or inline in serial mode.
#[cfg(feature = "parallel")]
macro_rules! execute_task {
    ($self:expr, $block:block) => {
        $self.threadpool.execute(move || $block);
    };
}

#[cfg(not(feature = "parallel"))]
macro_rules! execute_task {
    ($self:expr, $block:block) => {
        $block
    };
}

pub(crate) use execute_task;
