use dioxus::document::{self, Eval};
use dioxus_core::spawn_forever;
use futures_channel::{mpsc, oneshot};
use futures_util::{
    future::{self, Either},
    pin_mut, StreamExt,
};

use crate::{
    protocol::{ScriptCommand, ScriptEvent},
    CallbackHandle, GeolocationOptions, ModuleError, ModuleLoader, ScriptModule, WatchId,
};

const GEOLOCATION_JS: &str = include_str!("./js/geolocation.js");

/// Loads the bundled geolocation script through [`document::eval`].
///
/// Requires a running Dioxus web runtime. On other renderers the eval fails and so does the load.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalModuleLoader;

#[async_trait::async_trait(?Send)]
impl ModuleLoader for EvalModuleLoader {
    async fn load(&self, handle: CallbackHandle) -> Result<Box<dyn ScriptModule>, ModuleError> {
        let mut eval = document::eval(GEOLOCATION_JS);

        match eval.recv::<ScriptEvent>().await {
            Ok(ScriptEvent::Ready { supported: true }) => {}
            Ok(ScriptEvent::Ready { supported: false }) => return Err(ModuleError::Unsupported),
            Ok(other) => {
                return Err(ModuleError::Script(format!(
                    "unexpected first message from the geolocation script: {other:?}"
                )))
            }
            Err(err) => return Err(ModuleError::Script(err.to_string())),
        }

        let (commands, rx) = mpsc::unbounded();

        // The pump outlives the component that loaded it so the destroy message still reaches the
        // script after the component is unmounted.
        spawn_forever(pump(eval, rx, handle));

        Ok(Box::new(EvalModule { commands }))
    }
}

struct Command {
    message: ScriptCommand,
    ack: Option<oneshot::Sender<Result<(), ModuleError>>>,
}

/// A loaded geolocation script, driven through its eval channel.
pub struct EvalModule {
    commands: mpsc::UnboundedSender<Command>,
}

impl EvalModule {
    async fn request(&self, message: ScriptCommand) -> Result<(), ModuleError> {
        let (ack, acked) = oneshot::channel();
        self.commands
            .unbounded_send(Command {
                message,
                ack: Some(ack),
            })
            .map_err(|_| ModuleError::Disconnected)?;

        acked.await.map_err(|_| ModuleError::Disconnected)?
    }
}

#[async_trait::async_trait(?Send)]
impl ScriptModule for EvalModule {
    async fn get_location(
        &self,
        single_shot: bool,
        options: Option<&GeolocationOptions>,
    ) -> Result<(), ModuleError> {
        self.request(ScriptCommand::GetLocation {
            single_shot,
            options: options.copied(),
        })
        .await
    }

    async fn clear_watch_location(&self, watch_id: Option<WatchId>) -> Result<(), ModuleError> {
        self.request(ScriptCommand::ClearWatchLocation { watch_id })
            .await
    }

    fn dispose(&self) {
        _ = self.commands.unbounded_send(Command {
            message: ScriptCommand::Destroy,
            ack: None,
        });
        self.commands.close_channel();
    }
}

enum Next {
    Command(Option<Command>),
    Event(Result<ScriptEvent, document::EvalError>),
}

/// Whether the pump keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// The script end of the command channel.
trait CommandSink {
    fn send_command(&mut self, message: ScriptCommand) -> Result<(), ModuleError>;
}

impl CommandSink for Eval {
    fn send_command(&mut self, message: ScriptCommand) -> Result<(), ModuleError> {
        self.send(message)
            .map_err(|err| ModuleError::Script(err.to_string()))
    }
}

/// Hand one command to the script and acknowledge it with the send result.
///
/// A closed command channel or a `destroy` stops the pump.
fn forward(sink: &mut impl CommandSink, command: Option<Command>) -> Flow {
    let Some(Command { message, ack }) = command else {
        return Flow::Stop;
    };

    let destroy = matches!(message, ScriptCommand::Destroy);
    let sent = sink.send_command(message);
    if let Err(err) = &sent {
        tracing::error!("failed to send a command to the geolocation script: {err}");
    }
    if let Some(ack) = ack {
        _ = ack.send(sent);
    }

    if destroy {
        Flow::Stop
    } else {
        Flow::Continue
    }
}

async fn pump(
    mut eval: Eval,
    mut commands: mpsc::UnboundedReceiver<Command>,
    handle: CallbackHandle,
) {
    loop {
        let next = {
            let event = eval.recv::<ScriptEvent>();
            pin_mut!(event);
            match future::select(commands.next(), event).await {
                Either::Left((command, _)) => Next::Command(command),
                Either::Right((event, _)) => Next::Event(event),
            }
        };

        match next {
            Next::Command(command) => {
                if forward(&mut eval, command) == Flow::Stop {
                    break;
                }
            }
            Next::Event(Ok(event)) => event.dispatch(&handle).await,
            Next::Event(Err(err)) => {
                tracing::warn!("geolocation script channel closed: {err}");
                break;
            }
        }
    }

    tracing::trace!("geolocation script pump stopped");
}
