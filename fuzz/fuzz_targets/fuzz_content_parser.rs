#![no_main]

use flagpole::config::validate_content;
use flagpole::content::{PopulatedPage, Referral};
use flagpole_core::config::SiteContent;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Anything that parses must validate and render without panicking
        if let Ok(content) = SiteContent::from_json("fuzz", text) {
            let _ = validate_content(&content);
            let page = PopulatedPage::populate(&content, &Referral::with_code("fuzz"));
            let _ = page.regions_html();
            let _ = page.to_text();
        }
    }
});
