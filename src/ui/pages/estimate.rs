use dioxus::prelude::*;

use crate::{
    domain::{compute_estimate, AppState, PriceLookup},
    infra::{
        export::{self, format_money},
        price_list,
    },
    ui::components::{
        estimate_table::EstimateTable,
        kpi_card::KpiCard,
        price_list_table::{PriceListRow, PriceListTable},
        toast::{push_toast, ToastKind, ToastMessage},
    },
};

#[component]
pub fn EstimatePage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let lookup = state.with(|st| st.lookup.clone());
    let selections = state.with(|st| st.selections.clone());
    let markup = state.with(|st| st.markup_percent);
    let currency = state.with(|st| st.settings.currency.clone());
    let source_name = state.with(|st| st.source_name.clone());

    // The whole estimate is recomputed on every render; nothing derived is
    // kept in state.
    let estimate = lookup
        .as_ref()
        .map(|lookup| compute_estimate(&selections, lookup, markup));

    let price_rows: Vec<PriceListRow> = lookup
        .as_ref()
        .map(|lookup| {
            lookup
                .keys()
                .iter()
                .map(|key| {
                    let info = lookup.resolve(key);
                    PriceListRow {
                        key: key.clone(),
                        unit: info.map(|info| info.unit.clone()).unwrap_or_default(),
                        price: info.map(|info| info.price).unwrap_or_default(),
                        selected: selections.iter().any(|line| &line.key == key),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let kpi = estimate
        .as_ref()
        .map(|estimate| (estimate.totals, estimate.lines.len()));

    let total_display = estimate
        .as_ref()
        .map(|estimate| format_money(estimate.totals.total_before_markup))
        .unwrap_or_default();
    let total_after_display = estimate
        .as_ref()
        .map(|estimate| format_money(estimate.totals.total_after_markup))
        .unwrap_or_default();

    let source_label = source_name.unwrap_or_else(|| "файл не загружен".to_string());
    let markup_input_value = format!("{markup}");

    let on_load = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let Some(path) = rfd::FileDialog::new()
                .add_filter("Прайс-лист", &["csv", "xlsx", "xls", "ods"])
                .pick_file()
            else {
                return;
            };
            println!("Loading price list from {}", path.display());
            match price_list::load_price_list(&path) {
                Ok(entries) => {
                    let lookup = PriceLookup::from_entries(&entries);
                    let positions = lookup.len();
                    let file_name = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .unwrap_or("прайс-лист")
                        .to_string();
                    state.with_mut(|st| st.load_price_list(file_name, lookup));
                    push_toast(
                        toasts.clone(),
                        ToastKind::Success,
                        format!("✅ Прайс-лист загружен: {positions} позиций."),
                    );
                }
                Err(err) => {
                    println!("Failed to load price list: {err}");
                    push_toast(
                        toasts.clone(),
                        ToastKind::Error,
                        format!("Ошибка при чтении файла: {err}"),
                    );
                }
            }
        }
    };

    let on_toggle = {
        let mut state = state.clone();
        move |key: String| {
            state.with_mut(|st| st.toggle_selection(&key));
        }
    };

    let on_quantity = {
        let mut state = state.clone();
        move |(key, quantity): (String, f64)| {
            state.with_mut(|st| st.set_quantity(&key, quantity));
        }
    };

    let on_remove = {
        let mut state = state.clone();
        move |key: String| {
            state.with_mut(|st| st.remove_selection(&key));
        }
    };

    let on_markup_input = {
        let mut state = state.clone();
        move |evt: FormEvent| {
            // Any real number is allowed; negative markup is a discount.
            if let Ok(value) = evt.value().trim().parse::<f64>() {
                state.with_mut(|st| st.markup_percent = value);
            }
        }
    };

    let on_export = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let (selections, lookup, markup) = state.with(|st| {
                (st.selections.clone(), st.lookup.clone(), st.markup_percent)
            });
            let Some(lookup) = lookup else {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Сначала загрузите прайс-лист.",
                );
                return;
            };
            let estimate = compute_estimate(&selections, &lookup, markup);
            if estimate.lines.is_empty() {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Выберите хотя бы одну позицию для расчёта.",
                );
                return;
            }
            let Some(path) = rfd::FileDialog::new()
                .add_filter("CSV", &["csv"])
                .set_file_name("smeta.csv")
                .save_file()
            else {
                return;
            };
            match export::write_export(&path, &estimate) {
                Ok(()) => {
                    println!(
                        "Exported {} estimate lines to {}",
                        estimate.lines.len(),
                        path.display()
                    );
                    push_toast(toasts.clone(), ToastKind::Success, "⬇️ Смета сохранена.");
                }
                Err(err) => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Error,
                        format!("Не удалось сохранить смету: {err}"),
                    );
                }
            }
        }
    };

    rsx! {
        div { class: "space-y-8",
            if let Some((totals, line_count)) = kpi {
                section {
                    class: "grid gap-4 sm:grid-cols-3",
                    KpiCard {
                        title: "Итого без наценки".to_string(),
                        value: format!("{} {currency}", format_money(totals.total_before_markup)),
                        description: Some(format!("{line_count} строк сметы")),
                    }
                    KpiCard {
                        title: format!("Итого с наценкой {markup}%"),
                        value: format!("{} {currency}", format_money(totals.total_after_markup)),
                        description: Some("от неокруглённой суммы".to_string()),
                    }
                    KpiCard {
                        title: "Позиций в прайсе".to_string(),
                        value: format!("{}", price_rows.len()),
                        description: Some(source_label.clone()),
                    }
                }
            }

            section {
                class: "flex flex-wrap items-end gap-4 rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-4",
                div {
                    label { class: "block text-xs font-semibold uppercase text-slate-500", "Прайс-лист" }
                    button {
                        class: "mt-1 rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold text-white hover:bg-indigo-400",
                        onclick: on_load,
                        "📂 Загрузить (CSV / XLSX)"
                    }
                }
                div { class: "w-36",
                    label { class: "block text-xs font-semibold uppercase text-slate-500", "Наценка (%)" }
                    input {
                        class: "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none",
                        r#type: "number",
                        step: "0.5",
                        value: "{markup_input_value}",
                        oninput: on_markup_input,
                    }
                }
                div {
                    label { class: "block text-xs font-semibold uppercase text-slate-500", "Экспорт" }
                    button {
                        class: "mt-1 rounded-lg border border-slate-700 px-4 py-2 text-sm font-semibold text-slate-200 transition hover:border-indigo-500 hover:text-indigo-300",
                        onclick: on_export,
                        "⬇️ Скачать смету (CSV)"
                    }
                }
                span { class: "ml-auto text-xs text-slate-500", "{source_label}" }
            }

            section {
                class: "grid gap-6 lg:grid-cols-2",
                PriceListTable {
                    rows: price_rows.clone(),
                    currency: currency.clone(),
                    on_toggle,
                }

                div { class: "space-y-4",
                    match estimate {
                        None => rsx! {
                            p { class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-6 text-sm text-slate-500",
                                "📄 Загрузите CSV или XLSX-файл, чтобы начать работу."
                            }
                        },
                        Some(ref estimate) if estimate.lines.is_empty() => rsx! {
                            p { class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-6 text-sm text-slate-500",
                                "👆 Выберите хотя бы одну позицию для расчёта."
                            }
                        },
                        Some(estimate) => rsx! {
                            EstimateTable {
                                lines: estimate.lines.clone(),
                                currency: currency.clone(),
                                on_quantity,
                                on_remove,
                            }
                            div { class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-4 text-sm",
                                p { class: "text-slate-300",
                                    "💰 Итого без наценки: "
                                    span { class: "font-semibold text-slate-100", "{total_display} {currency}" }
                                }
                                p { class: "mt-1 text-slate-300",
                                    "💰 Итого с наценкой {markup}%: "
                                    span { class: "font-semibold text-emerald-200", "{total_after_display} {currency}" }
                                }
                            }
                        },
                    }
                }
            }
        }
    }
}
