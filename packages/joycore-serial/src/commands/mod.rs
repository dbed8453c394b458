use std::future::Future;

use crate::Connection;

pub mod device;
pub mod file;

/// A typed request that turns a controller's response lines into a value.
pub trait Command {
    type Output;

    fn execute<C: Connection + ?Sized>(
        self,
        connection: &mut C,
    ) -> impl Future<Output = Result<Self::Output, C::Error>>;
}
