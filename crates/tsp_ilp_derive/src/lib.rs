mod cli_options;
mod cli_value;
mod kv_display;
mod timer;
mod utils;

use proc_macro::TokenStream;

/// Wraps a function body and logs its wall-clock duration at debug level.
#[proc_macro_attribute]
pub fn timer(attr: TokenStream, item: TokenStream) -> TokenStream {
    timer::timer_inner(attr, item)
}

/// Generates `parse` and `Display` for a unit-variant enum used as a CLI
/// option value, with kebab-case names and an expected-values error message.
#[proc_macro_derive(CliValue, attributes(cli_value, cli))]
pub fn derive_cli_value(item: TokenStream) -> TokenStream {
    cli_value::derive_cli_value_inner(item)
}

/// Generates `apply_cli_option` for an options struct: every field tagged
/// `#[cli(long = "...")]` becomes a `--long <value>` handler.
#[proc_macro_derive(CliOptions, attributes(cli))]
pub fn derive_cli_options(item: TokenStream) -> TokenStream {
    cli_options::derive_cli_options_inner(item)
}

/// Generates a `Display` impl printing one `\t<key> = <value>` line per
/// field, for the options banner logged at startup.
#[proc_macro_derive(KvDisplay, attributes(kv))]
pub fn derive_kv_display(item: TokenStream) -> TokenStream {
    kv_display::derive_kv_display_inner(item)
}
