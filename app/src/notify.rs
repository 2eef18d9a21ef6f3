use std::error::Error;

pub const DEFAULT_URL: &str = "http://localhost:20515/room/update";

#[derive(Debug, thiserror::Error)]
#[error("unable to notify {url}: {source}")]
pub struct NotificationError {
    pub url: String,
    #[source]
    pub source: Box<dyn Error + Send + Sync + 'static>,
}

pub trait Notify {
    fn notify(&self) -> Result<(), NotificationError>;
}

pub struct Notifier {
    agent: ureq::Agent,
    url: String,
}

impl Notifier {
    pub fn new<U: Into<String>>(url: U) -> Self {
        Notifier {
            agent: ureq::Agent::new(),
            url: url.into(),
        }
    }
}

impl Notify for Notifier {
    fn notify(&self) -> Result<(), NotificationError> {
        match self.agent.post(&self.url).call() {
            Ok(_) => Ok(()),
            // The service got the signal even if it didn't like it.
            Err(ureq::Error::Status(code, _)) => {
                log::warn!("{} responded with status {}", self.url, code);
                Ok(())
            }
            Err(ureq::Error::Transport(transport)) => Err(NotificationError {
                url: self.url.clone(),
                source: Box::new(transport),
            }),
        }
    }
}
