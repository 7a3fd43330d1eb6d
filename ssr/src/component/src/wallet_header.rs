use chain::Address;
use leptos::prelude::*;
use utils::format::short_address;

/// Title bar with the connect button, or the connected identity plus a
/// button to pick another account.
#[component]
pub fn WalletHeader(
    #[prop(into)] account: Signal<Option<Address>>,
    #[prop(into)] is_owner: Signal<bool>,
    #[prop(into)] busy: Signal<bool>,
    /// Called with `true` when the holder wants to pick another account.
    #[prop(into)]
    on_connect: Callback<bool>,
) -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Tournament Platform"</h1>
            <Show
                when=move || account.get().is_some()
                fallback=move || {
                    view! {
                        <button
                            class="connect-btn"
                            disabled=move || busy.get()
                            on:click=move |_| on_connect.run(false)
                        >
                            "Connect Wallet"
                        </button>
                    }
                }
            >
                <div class="wallet-info">
                    <span>
                        {move || account.get().map(|a| short_address(&a)).unwrap_or_default()}
                        {move || if is_owner.get() { " (Owner)" } else { "" }}
                    </span>
                    <button
                        class="change-wallet-btn"
                        disabled=move || busy.get()
                        on:click=move |_| on_connect.run(true)
                    >
                        "Change Wallet"
                    </button>
                </div>
            </Show>
        </header>
    }
}
