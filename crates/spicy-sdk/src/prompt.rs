//! Interactive OTP entry

use spicy_core::error::{SpicyError, SpicyResult};
use std::io::Write;

/// Reads the one-time code from standard input on a blocking task
#[derive(Debug, Clone)]
pub struct TerminalOtpPrompt {
    message: String,
}

impl Default for TerminalOtpPrompt {
    fn default() -> Self {
        Self::new("Please enter the OTP you received: ")
    }
}

impl TerminalOtpPrompt {
    /// Prompt with a custom message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Print the prompt and read one line
    pub async fn read(&self) -> SpicyResult<String> {
        print!("{}", self.message);
        let _ = std::io::stdout().flush();

        let (read, line) = tokio::task::spawn_blocking(|| {
            let mut input = String::new();
            std::io::stdin().read_line(&mut input).map(|read| (read, input))
        })
        .await
        .map_err(|e| SpicyError::io(format!("OTP prompt task failed: {}", e)))??;

        parse_input(read, &line)
    }
}

fn parse_input(bytes_read: usize, line: &str) -> SpicyResult<String> {
    if bytes_read == 0 {
        return Err(SpicyError::invalid_input("Standard input closed before an OTP was entered"));
    }
    let code = line.trim();
    if code.is_empty() {
        return Err(SpicyError::invalid_field("otp", "No OTP entered"));
    }
    Ok(code.to_string())
}
