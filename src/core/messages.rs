//! User-facing reply texts
//!
//! Every reply the router can produce lives here so handlers and tests
//! agree on the exact wording.

use indoc::indoc;

pub const UNEXPECTED_SERVER_ERROR: &str = "Unexpected server error";

pub const NOT_CONNECTED_TO_SHEET: &str = "You are not yet connected to a sheet. Please either create a new one or connect to an existing one.\n/createSheet /connectSheet";

pub const START_GREETING: &str = "Hi! I keep track of shared budget sheets: create categories and log payments right from this chat.";

pub const START_CONNECT: &str = indoc! {"
    To get started, create a new sheet with /createSheet
    or connect to an existing one with /connectSheet"};

pub const START_FULL_HELP: &str = "Send /help to see everything I can do.";

pub const HELP: &str = indoc! {"
    Sheets
    /createSheet - create a new password-protected sheet
    /connectSheet - connect to an existing sheet by its ID and password
    /disconnectSheet - disconnect this chat from its sheet
    /listSheets - list the sheets you own

    Categories
    /createCategory - add a category to the connected sheet
    /listCategories - list the categories of the connected sheet

    Payments
    Send a line like `42 groceries` or `-5.5 refund`:
    the amount, one space, then the exact category name."};

// Sheet lifecycle
pub const INPUT_NEW_SHEET_NAME: &str = "Create and enter a name for the new sheet";
pub const INPUT_NEW_SHEET_PASSWORD: &str = "Please enter new sheet password";
pub const INPUT_SHEET_ID: &str = "Please enter sheet ID (it is shown when a sheet is created)";
pub const INPUT_SHEET_PASSWORD: &str = "Please enter sheet password";
pub const INCORRECT_SHEET_ID_FORMAT: &str = "Incorrect sheet ID format, expected to be xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx, e.g e72e1f4c-fb53-4455-9f0e-a1e9d0e1bc4d";
pub const SUCCESS_CONNECT_TO_SHEET: &str = "Successfully connected to the sheet";
pub const INCORRECT_PASSWORD: &str = "Incorrect password, please try again";
pub const INCORRECT_NEW_PASSWORD_SLASH: &str = "Sheet password shouldn't start with /";
pub const INCORRECT_NEW_PASSWORD_TOO_SHORT: &str = "Sheet password should be at least 3 characters long";
pub const INCORRECT_NEW_SHEET_NAME_SLASH: &str = "Sheet name shouldn't start with /";
pub const INCORRECT_NEW_SHEET_NAME_TOO_SHORT: &str = "Sheet name should be at least 3 characters long";
pub const SUCCESS_DISCONNECT_SHEET: &str = "Successfully disconnected from the sheet";
pub const NO_SHEETS_OWNED: &str = "You don't own any sheets yet. Create one with /createSheet";
pub const LIST_SHEETS_OUTRO: &str = indoc! {"
    To add new sheets (if you have one, you are very unlikely to need more), click /createSheet
    To connect to one of these or other sheets, click /connectSheet"};

// Categories
pub const INPUT_CATEGORY_NAME: &str = "Please enter new category name";
pub const SUCCESS_CREATE_CATEGORY: &str = "New category is created!";
pub const NO_CATEGORIES: &str = "This sheet has no categories yet. To add one, click /createCategory";
pub const LIST_CATEGORIES_OUTRO: &str = "To add new categories, click /createCategory";

// Payments
pub const FAILURE_UNKNOWN_CATEGORY_NAME: &str = "Could not find category with this name";
pub const SUCCESS_CREATE_PAYMENT: &str = "Successfully created payment record";
pub const FAILURE_PARSING: &str = "Failed to parse. Expected `<amount> <category>`, e.g. `42 groceries`. See /help";

/// Reply sent after a sheet is created
pub fn created_new_sheet(name: &str, sheet_id: &str) -> String {
    format!("New sheet is created!\nName: {}\nID: {}", name, sheet_id)
}

/// First line of the /listSheets reply
pub fn list_sheets_intro(count: usize) -> String {
    format!("Your user owns the following {} sheets:", count)
}

/// First line of the /listCategories reply
pub fn list_categories_intro(count: usize) -> String {
    format!("This sheet has the following {} categories:", count)
}
