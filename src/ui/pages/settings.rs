use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{AppState, EstimateSettings},
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let initial = state.with(|st| st.settings.clone());

    let mut currency_input = use_signal(|| initial.currency.clone());
    let mut markup_input = use_signal(|| format!("{}", initial.default_markup_percent));

    let on_apply = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let currency = currency_input().trim().to_string();
            if currency.is_empty() {
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    "Укажите символ валюты.",
                );
                return;
            }
            let Ok(default_markup) = markup_input().trim().parse::<f64>() else {
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    "Наценка по умолчанию должна быть числом.",
                );
                return;
            };

            state.with_mut(|st| {
                st.settings = EstimateSettings {
                    currency,
                    default_markup_percent: default_markup,
                };
            });
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Success, "Настройки сохранены.");
        }
    };

    let on_reset = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let defaults = EstimateSettings::default();
            currency_input.set(defaults.currency.clone());
            markup_input.set(format!("{}", defaults.default_markup_percent));
            state.with_mut(|st| st.settings = defaults);
            persist_user_state(&state);
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Настройки сброшены к значениям по умолчанию.",
            );
        }
    };

    rsx! {
        div { class: "space-y-8",
            section {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-4",
                h2 { class: "text-sm font-semibold text-slate-200", "Отображение" }
                p { class: "mt-1 text-xs text-slate-500",
                    "Валюта влияет только на подписи; расчёт от неё не зависит."
                }
                div { class: "mt-4 flex flex-wrap items-end gap-4",
                    div { class: "w-32",
                        label { class: "block text-xs font-semibold uppercase text-slate-500", "Валюта" }
                        input {
                            class: "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none",
                            value: currency_input(),
                            oninput: move |evt| currency_input.set(evt.value().to_string()),
                        }
                    }
                    div { class: "w-48",
                        label { class: "block text-xs font-semibold uppercase text-slate-500", "Наценка по умолчанию (%)" }
                        input {
                            class: "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none",
                            r#type: "number",
                            step: "0.5",
                            value: markup_input(),
                            oninput: move |evt| markup_input.set(evt.value().to_string()),
                        }
                    }
                    button {
                        class: "rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold text-white hover:bg-indigo-400",
                        onclick: on_apply,
                        "Сохранить"
                    }
                    button {
                        class: "rounded-lg border border-slate-700 px-4 py-2 text-sm text-slate-300 transition hover:border-slate-500",
                        onclick: on_reset,
                        "Сбросить"
                    }
                }
            }
            section {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-4 text-xs text-slate-500",
                p { "Наценка по умолчанию подставляется при запуске; на странице сметы её можно менять для текущего расчёта." }
            }
        }
    }
}
