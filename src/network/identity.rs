// * BrowserIdentity defines the fingerprint the headless browser presents to the marketplace.
#[derive(Debug, Clone)]
pub struct BrowserIdentity {
    pub chrome_version: &'static str,
    pub user_agent: String,
    pub accept_language: &'static str,
    pub window_size: (u32, u32),
}

impl BrowserIdentity {
    // * Desktop Chrome 120 on Windows; a headless UA string gets served a captcha page.
    pub fn desktop_chrome_120() -> Self {
        let major_version = "120";
        let full_version = "120.0.6099.109";

        Self {
            chrome_version: major_version,
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                full_version
            ),
            accept_language: "en-US,en;q=0.9",
            window_size: (1366, 900),
        }
    }

    // * Renders the identity as Chromium command line switches.
    pub fn launch_args(&self) -> Vec<String> {
        let primary_lang = self
            .accept_language
            .split(',')
            .next()
            .unwrap_or("en-US");

        vec![
            format!("--user-agent={}", self.user_agent),
            format!("--lang={}", primary_lang),
            format!("--window-size={},{}", self.window_size.0, self.window_size.1),
            "--disable-blink-features=AutomationControlled".to_string(),
        ]
    }
}

impl Default for BrowserIdentity {
    fn default() -> Self {
        Self::desktop_chrome_120()
    }
}
