use std::error::Error;

/// Logs and discards the error of a `Result`, for call sites whose failures must not
/// stop the caller.
pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                let mut source = err.source();
                while let Some(cause) = source {
                    log::debug!("caused by: {cause}");
                    source = cause.source();
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_log() {
        let ok: Result<u8, std::io::Error> = Ok(3);
        assert_eq!(ok.ok_log(), Some(3));

        let err: Result<u8, std::io::Error> = Err(std::io::ErrorKind::BrokenPipe.into());
        assert_eq!(err.ok_log(), None);
    }
}
