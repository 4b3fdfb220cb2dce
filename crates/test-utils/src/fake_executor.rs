use std::collections::VecDeque;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

use lvs::exec::{CommandExecutor, MessageStyle, Result, SubprocessFailure};
use tracing::debug;

/// One recorded call into the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute { exe: String, args: Vec<String> },
    Run { argv: Vec<String> },
    ExecuteWithStdin { input: Vec<u8>, exe: String, args: Vec<String> },
}

impl Call {
    /// Program followed by its arguments, whatever the operation.
    pub fn argv(&self) -> Vec<String> {
        match self {
            Call::Execute { exe, args } | Call::ExecuteWithStdin { exe, args, .. } => {
                let mut argv = vec![exe.clone()];
                argv.extend(args.iter().cloned());
                argv
            }
            Call::Run { argv } => argv.clone(),
        }
    }

    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

/// Canned result for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Exit 0 with the given merged output.
    Success(Vec<u8>),
    /// Non-zero exit with the given merged output.
    Exit { code: i32, output: Vec<u8> },
    /// The program could not be spawned.
    Missing,
}

impl Response {
    pub fn ok() -> Self {
        Response::Success(Vec::new())
    }

    pub fn output(output: &str) -> Self {
        Response::Success(output.as_bytes().to_vec())
    }

    pub fn fail(output: &str) -> Self {
        Response::Exit {
            code: 1,
            output: output.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<(Vec<String>, Response)>,
    queue: VecDeque<Response>,
}

/// A fake executor that:
/// - records every call it receives
/// - answers from prefix rules first, then from a FIFO queue, and succeeds
///   with empty output when neither matches.
///
/// Clones share the same recording and script.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Arc<Mutex<Script>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call whose argv starts with `prefix` with `response`.
    pub fn on(self, prefix: &[&str], response: Response) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            let prefix = prefix.iter().map(|s| s.to_string()).collect();
            script.rules.push((prefix, response));
        }
        self
    }

    /// Queue a response for the next call that no rule matches.
    pub fn then(self, response: Response) -> Self {
        self.script.lock().unwrap().queue.push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Call::command_line).collect()
    }

    fn record(&self, call: Call) -> Response {
        let argv = call.argv();
        debug!(command = %call.command_line(), "fake executor call");
        self.calls.lock().unwrap().push(call);

        let mut script = self.script.lock().unwrap();
        let rule = script
            .rules
            .iter()
            .find(|(prefix, _)| argv.starts_with(prefix))
            .map(|(_, response)| response.clone());

        rule.or_else(|| script.queue.pop_front())
            .unwrap_or_else(Response::ok)
    }
}

fn into_result(program: &str, response: Response, style: MessageStyle) -> Result<Vec<u8>> {
    match response {
        Response::Success(output) => Ok(output),
        Response::Exit { code, output } => Err(SubprocessFailure::exited(
            program,
            ExitStatus::from_raw(code << 8),
        )
        .with_output(output)
        .with_style(style)),
        Response::Missing => Err(SubprocessFailure::spawn(
            program,
            io::Error::from(io::ErrorKind::NotFound),
        )
        .with_style(style)),
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(&self, exe: &str, args: &[String]) -> Result<()> {
        let response = self.record(Call::Execute {
            exe: exe.to_string(),
            args: args.to_vec(),
        });
        into_result(exe, response, MessageStyle::Separator).map(|_| ())
    }

    fn run(&self, argv: &[String]) -> Result<Vec<u8>> {
        let response = self.record(Call::Run {
            argv: argv.to_vec(),
        });
        let program = argv.first().map(String::as_str).unwrap_or_default();
        into_result(program, response, MessageStyle::OutputMarker)
    }

    fn execute_with_stdin(&self, input: &[u8], exe: &str, args: &[String]) -> Result<()> {
        let response = self.record(Call::ExecuteWithStdin {
            input: input.to_vec(),
            exe: exe.to_string(),
            args: args.to_vec(),
        });
        into_result(exe, response, MessageStyle::Separator).map(|_| ())
    }
}
