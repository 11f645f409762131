use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, parse_macro_input};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let label = parse_macro_input!(attr as LitStr);
    let mut func = parse_macro_input!(item as ItemFn);

    // Run the original body in a closure so early returns and `?` still
    // pass through the timing log.
    let block = &func.block;
    let timed: syn::Block = syn::parse_quote!({
        let __timer_start = std::time::Instant::now();
        let __timer_result = (move || #block)();
        log::debug!(
            "{}: elapsed_s={:.3}",
            #label,
            __timer_start.elapsed().as_secs_f64()
        );
        __timer_result
    });

    func.block = Box::new(timed);
    TokenStream::from(quote!(#func))
}
