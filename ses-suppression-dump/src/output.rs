use crate::error::{Error, FetchPageError};
use futures_core::Stream;
use futures_util::StreamExt;
use std::io::Write;

/// Writes each address on its own line, flushing as it goes.
///
/// Returns how many lines were written. Lines written before an error stay written.
pub async fn write_addresses<S, W>(addresses: S, out: &mut W) -> Result<usize, Error>
where
    S: Stream<Item = Result<String, FetchPageError>>,
    W: Write,
{
    let mut addresses = std::pin::pin!(addresses);
    let mut written = 0;

    while let Some(address) = addresses.next().await {
        writeln!(out, "{}", address?)?;
        out.flush()?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{
        testing::{auth_error, page, ScriptedApi},
        SuppressionListReader,
    };
    use std::io;

    #[tokio::test(start_paused = true)]
    async fn prints_one_address_per_line_across_pages() {
        let api = ScriptedApi::new([
            Ok(page(&["a@x.com", "b@x.com"], Some("T1"))),
            Ok(page(&["c@x.com"], None)),
        ]);
        let mut out = Vec::new();

        let written = write_addresses(SuppressionListReader::new(&api).drain(), &mut out)
            .await
            .unwrap();

        assert_eq!(written, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "a@x.com\nb@x.com\nc@x.com\n");
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failure_on_first_call_prints_nothing() {
        let api = ScriptedApi::new([Err(auth_error())]);
        let mut out = Vec::new();

        let err = write_addresses(SuppressionListReader::new(&api).drain(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::FetchPage(FetchPageError::Ses(ref e)) if e.code == "UnrecognizedClientException"));
        assert!(out.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_mid_dump_keeps_earlier_lines() {
        let api = ScriptedApi::new([Ok(page(&["a@x.com"], Some("T1"))), Err(auth_error())]);
        let mut out = Vec::new();

        let err = write_addresses(SuppressionListReader::new(&api).drain(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::FetchPage(_)));
        assert_eq!(String::from_utf8(out).unwrap(), "a@x.com\n");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn write_errors_stop_the_dump() {
        let api = ScriptedApi::new([Ok(page(&["a@x.com"], Some("T1")))]);

        let err = write_addresses(SuppressionListReader::new(&api).drain(), &mut ClosedPipe)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Output(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(api.requests.borrow().len(), 1);
    }
}
