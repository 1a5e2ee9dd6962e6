//! Commonly used errors

mod private {
    use eyre::Chain;
    use std::error::Error;

    pub trait ErrorChain {
        fn chain(&self) -> Chain<'_>;
    }

    impl ErrorChain for dyn Error + 'static {
        fn chain(&self) -> Chain<'_> {
            Chain::new(self)
        }
    }

    impl ErrorChain for eyre::Report {
        fn chain(&self) -> Chain<'_> {
            self.chain()
        }
    }
}

/// Displays a chain of errors in a single line, e.g. for status messages.
pub fn display_chain<E: private::ErrorChain + ?Sized>(error: &E) -> String {
    dedup_chain(error).join("; ")
}

/// Returns the messages of an error and its sources, dropping a source whose message is already
/// contained in its parent's (`outer: inner; inner` becomes `outer: inner`).
pub fn dedup_chain<E: private::ErrorChain + ?Sized>(error: &E) -> Vec<String> {
    let mut causes: Vec<String> =
        error.chain().map(|cause| cause.to_string().trim().to_string()).collect();
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// Returns the first ERC-4337 entry point revert code (`AA21`, `AA33`, ...) in the chain.
///
/// Bundlers embed these codes in their error messages; the second digit groups them by the
/// validation stage that failed (`1` account creation, `2` account, `3` paymaster).
pub fn entry_point_code<E: private::ErrorChain + ?Sized>(error: &E) -> Option<String> {
    error.chain().find_map(|cause| find_code(&cause.to_string()).map(str::to_string))
}

fn find_code(msg: &str) -> Option<&str> {
    let bytes = msg.as_bytes();
    (0..bytes.len().saturating_sub(3)).find_map(|i| {
        let at_boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        let after = bytes.get(i + 4).is_none_or(|b| !b.is_ascii_alphanumeric());
        let digits = bytes[i + 2..i + 4].iter().all(u8::is_ascii_digit);
        (at_boundary && after && bytes[i..i + 2] == *b"AA" && digits).then(|| &msg[i..i + 4])
    })
}
