mod message;
mod scrape_state;
mod settings;

pub use message::Message;
pub use scrape_state::ScrapeState;
pub use settings::Settings;
