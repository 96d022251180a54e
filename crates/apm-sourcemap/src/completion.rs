//! Fan-in of upload tasks and the ignore-errors policy

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

use crate::error::UploadError;
use crate::logger::Logger;

/// Drive every upload to completion and reduce them to one outcome.
///
/// Tasks are polled concurrently on the calling task, in the order given.
/// A failure never cancels the others: every task settles before this
/// returns. The first failure to resolve is logged and either returned or,
/// with `ignore_errors`, swallowed.
pub async fn settle<I, F>(tasks: I, ignore_errors: bool, logger: &Logger) -> Result<(), UploadError>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<(), UploadError>>,
{
    let mut pending: FuturesUnordered<F> = tasks.into_iter().collect();
    let mut first_error = None;
    let mut failed = 0usize;

    while let Some(outcome) = pending.next().await {
        if let Err(err) = outcome {
            failed += 1;
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }

    match first_error {
        None => {
            logger.debug("finished uploading sourcemaps.");
            Ok(())
        }
        Some(err) => {
            logger.error(&err);
            if ignore_errors {
                logger.debug(format_args!(
                    "ignoring {} failed upload(s) because ignoreErrors is set",
                    failed
                ));
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}
