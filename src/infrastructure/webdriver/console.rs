//! The contractor console driven through a WebDriver browser session.
//!
//! The capacity page renders one table row per contractor. Expanding a row
//! reveals a detail row whose single wide cell holds the pause checkbox;
//! checked means paused.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::client::{
    xpath_literal, BrowserOptions, ElementRef, Locator, WebDriverClient, WebDriverSession,
    ENTER_KEY,
};
use super::error::WebDriverError;
use super::wait::WaitPolicy;
use crate::domain::errors::{EntityError, EntityResult, RunError};
use crate::domain::models::{ConsoleConfig, ConsoleCredentials};
use crate::domain::ports::{
    ConsoleSession, Located, SessionProvider, StateObserver, StateToggler,
};

const ROW_XPATH: &str = "//tr[contains(@class, 'StyledTableRow')]";
const EMAIL_INPUT: &str = "#reg-login-email";
const PASSWORD_INPUT: &str = "#inputs-password";

/// From a contractor row to the pause checkbox in the detail row below it.
const DETAIL_CHECKBOX: &str = "/following-sibling::tr[1]\
     //td[contains(@class, 'StyledTableCell') and @colspan='7']\
     //input[@type='checkbox' and contains(@class, 'StyledCheckbox')]";

/// The expand toggle in the row holding a name cell.
const EXPAND_FROM_CELL: &str =
    "./ancestor::tr[1]//button[starts-with(@aria-label, 'Expand row for')]";

/// Name cells inside contractor rows whose text contains `name`.
fn name_cells_xpath(name: &str) -> String {
    format!("{ROW_XPATH}//div[contains(text(), {})]", xpath_literal(name))
}

/// The expand toggle of the first row labelled `label`.
fn expand_button_xpath(label: &str) -> String {
    format!(
        "(//button[@aria-label={}])[1]",
        xpath_literal(&format!("Expand row for {label}"))
    )
}

/// The pause checkbox for the row holding a name cell.
fn checkbox_from_cell() -> String {
    format!("./ancestor::tr[1]{DETAIL_CHECKBOX}")
}

/// The pause checkbox in the detail row that follows `label`'s row.
fn checkbox_xpath(label: &str) -> String {
    format!("{}/ancestor::tr[1]{DETAIL_CHECKBOX}", expand_button_xpath(label))
}

/// Opens browser sessions against a WebDriver endpoint.
pub struct WebDriverConsole {
    client: WebDriverClient,
    config: ConsoleConfig,
}

impl WebDriverConsole {
    /// Console for the configured WebDriver endpoint. No session is started
    /// until [`SessionProvider::open`].
    pub fn new(config: &ConsoleConfig) -> Result<Self, WebDriverError> {
        // Each command gets the wait ceiling plus headroom for page loads
        let request_timeout = Duration::from_millis(config.wait_timeout_ms.saturating_mul(3));
        Ok(Self {
            client: WebDriverClient::new(&config.webdriver_url, request_timeout)?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl SessionProvider for WebDriverConsole {
    async fn open(&self) -> Result<Box<dyn ConsoleSession>, RunError> {
        let options = BrowserOptions {
            headless: self.config.headless,
            args: self.config.browser_args.clone(),
        };
        let session = self
            .client
            .new_session(&options)
            .await
            .map_err(|e| RunError::Session(format!("failed to start browser: {e}")))?;
        info!(session_id = %session.id(), "browser session opened");

        Ok(Box::new(WebDriverConsoleSession {
            session,
            login_url: self.config.login_url.clone(),
            capacity_url: self.config.capacity_url.clone(),
            login_settle: Duration::from_millis(self.config.login_settle_ms),
            page_settle: Duration::from_millis(self.config.page_settle_ms),
            wait: WaitPolicy::from_config(&self.config),
        }))
    }
}

/// One logged-in browser.
///
/// [`Located::handle`] is the WebDriver id of the contractor's name cell, so
/// the row that was chosen during lookup is the row that gets read and
/// toggled.
pub struct WebDriverConsoleSession {
    session: WebDriverSession,
    login_url: String,
    capacity_url: String,
    login_settle: Duration,
    page_settle: Duration,
    wait: WaitPolicy,
}

impl WebDriverConsoleSession {
    async fn wait_for_element(
        &self,
        what: &str,
        locator: Locator,
    ) -> Result<ElementRef, WebDriverError> {
        let session = &self.session;
        let locator = &locator;
        self.wait
            .until(what, || async move { session.find_element(locator).await.map(Some) })
            .await
    }

    /// Click, retrying while something overlays the element.
    async fn click_when_ready(
        &self,
        what: &str,
        element: &ElementRef,
    ) -> Result<(), WebDriverError> {
        let session = &self.session;
        self.wait
            .until(what, || async move { session.click(element).await.map(Some) })
            .await
    }

    /// First element in `located`'s row matching `from_cell`, searched
    /// below its name cell. A re-rendered cell falls back to `by_label`.
    async fn find_in_row(
        &self,
        located: &Located,
        from_cell: &str,
        by_label: String,
    ) -> Result<Option<ElementRef>, WebDriverError> {
        let cell = ElementRef(located.handle.clone());
        let found = match self
            .session
            .find_elements_from(&cell, &Locator::xpath(from_cell))
            .await
        {
            Err(WebDriverError::StaleElement(_)) => {
                debug!(contractor = %located.label, "name cell re-rendered, finding row by label");
                self.session.find_elements(&Locator::xpath(by_label)).await?
            }
            other => other?,
        };
        Ok(found.into_iter().next())
    }

    /// Expand `located`'s row if needed and return its pause checkbox.
    async fn reveal_checkbox(&self, located: &Located) -> Result<ElementRef, WebDriverError> {
        let label = located.label.as_str();
        let from_cell = checkbox_from_cell();
        let from_cell = from_cell.as_str();

        if let Some(existing) = self
            .find_in_row(located, from_cell, checkbox_xpath(label))
            .await?
        {
            debug!(contractor = %label, "row already expanded");
            return Ok(existing);
        }

        let what = format!("expand button for {label:?}");
        let button = self
            .wait
            .until(&what, || async move {
                self.find_in_row(located, EXPAND_FROM_CELL, expand_button_xpath(label))
                    .await
            })
            .await?;
        self.click_when_ready(&what, &button).await?;

        self.wait
            .until(&format!("pause checkbox for {label:?}"), || async move {
                self.find_in_row(located, from_cell, checkbox_xpath(label)).await
            })
            .await
    }

    async fn read_checkbox(&self, located: &Located) -> Result<(ElementRef, bool), WebDriverError> {
        let checkbox = self.reveal_checkbox(located).await?;
        self.session.scroll_into_view(&checkbox).await?;
        let checked = self.session.is_selected(&checkbox).await?;
        Ok((checkbox, checked))
    }
}

#[async_trait]
impl StateObserver for WebDriverConsoleSession {
    /// Polls until at least one name cell renders. A table that stays empty
    /// for the whole wait yields no candidates; lookups that keep failing
    /// transiently end in a timeout.
    async fn candidates(&self, name: &str) -> EntityResult<Vec<Located>> {
        let session = &self.session;
        let cells = Locator::xpath(name_cells_xpath(name));
        let cells = &cells;
        let empty = AtomicBool::new(false);
        let last_was_empty = &empty;

        let lookup = self
            .wait
            .until(&format!("live entry for {name:?}"), || async move {
                last_was_empty.store(false, Ordering::Relaxed);
                let mut found = Vec::new();
                for cell in session.find_elements(cells).await? {
                    let text = session.element_text(&cell).await?;
                    found.push(Located::new(text.trim(), cell.0));
                }
                last_was_empty.store(found.is_empty(), Ordering::Relaxed);
                Ok((!found.is_empty()).then_some(found))
            })
            .await;

        match lookup {
            Ok(found) => Ok(found),
            Err(WebDriverError::Timeout { .. }) if empty.load(Ordering::Relaxed) => {
                Ok(Vec::new())
            }
            Err(e) => Err(e.into_entity(EntityError::Locate)),
        }
    }

    #[instrument(skip_all, fields(contractor = %located.label))]
    async fn is_paused(&self, located: &Located) -> EntityResult<bool> {
        let (_, checked) = self
            .read_checkbox(located)
            .await
            .map_err(|e| e.into_entity(EntityError::Observe))?;
        Ok(checked)
    }
}

#[async_trait]
impl StateToggler for WebDriverConsoleSession {
    #[instrument(skip_all, fields(contractor = %located.label, paused = paused))]
    async fn set_paused(&self, located: &Located, paused: bool) -> EntityResult<()> {
        let label = located.label.as_str();
        let toggle = async {
            let (checkbox, checked) = self.read_checkbox(located).await?;
            if checked == paused {
                return Ok(());
            }
            self.click_when_ready(&format!("pause checkbox for {label:?}"), &checkbox)
                .await?;

            let session = &self.session;
            let checkbox = &checkbox;
            let target = if paused { "checked" } else { "unchecked" };
            self.wait
                .until(&format!("checkbox for {label:?} to be {target}"), || async move {
                    Ok((session.is_selected(checkbox).await? == paused).then_some(()))
                })
                .await
        };
        toggle
            .await
            .map_err(|e: WebDriverError| e.into_entity(EntityError::Toggle))
    }
}

#[async_trait]
impl ConsoleSession for WebDriverConsoleSession {
    #[instrument(skip_all, fields(principal = %credentials.principal))]
    async fn login(&self, credentials: &ConsoleCredentials) -> Result<(), RunError> {
        let attempt = async {
            self.session.goto(&self.login_url).await?;
            let email = self
                .wait_for_element("login form", Locator::css(EMAIL_INPUT))
                .await?;
            let password = self
                .session
                .find_element(&Locator::css(PASSWORD_INPUT))
                .await?;

            self.session.send_keys(&email, &credentials.principal).await?;
            self.session.send_keys(&password, &credentials.secret).await?;
            self.session.send_keys(&email, ENTER_KEY).await
        };
        attempt
            .await
            .map_err(|e: WebDriverError| RunError::Session(format!("login failed: {e}")))?;

        sleep(self.login_settle).await;
        Ok(())
    }

    async fn open_capacity_view(&self) -> Result<(), RunError> {
        self.session
            .goto(&self.capacity_url)
            .await
            .map_err(|e| RunError::Session(format!("failed to open capacity page: {e}")))?;
        sleep(self.page_settle).await;

        let session = &self.session;
        let rows = Locator::xpath(ROW_XPATH);
        let rows = &rows;
        let rendered = self
            .wait
            .until("contractor table", || async move {
                let found = session.find_elements(rows).await?;
                Ok((!found.is_empty()).then_some(found.len()))
            })
            .await;

        match rendered {
            Ok(count) => info!(rows = count, "capacity page ready"),
            Err(WebDriverError::Timeout { .. }) => {
                warn!("capacity page shows no contractor rows");
            }
            Err(e) => return Err(RunError::Session(format!("capacity page unreadable: {e}"))),
        }
        Ok(())
    }

    fn observer(&self) -> &dyn StateObserver {
        self
    }

    fn toggler(&self) -> &dyn StateToggler {
        self
    }

    async fn close(&self) -> Result<(), RunError> {
        self.session.delete().await?;
        info!(session_id = %self.session.id(), "browser session closed");
        Ok(())
    }
}
