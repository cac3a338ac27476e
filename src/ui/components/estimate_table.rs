use dioxus::prelude::*;

use crate::domain::EstimateLine;
use crate::infra::export::{format_money, format_quantity};

#[component]
pub fn EstimateTable(
    lines: Vec<EstimateLine>,
    currency: String,
    on_quantity: EventHandler<(String, f64)>,
    on_remove: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            class: "rounded-xl border border-slate-800 bg-slate-900/40",
            header {
                class: "flex items-center justify-between border-b border-slate-800 px-4 py-3",
                h3 { class: "text-sm font-semibold text-slate-200", "📋 Смета" }
                span { class: "text-xs text-slate-500", "{lines.len()} строк" }
            }
            table {
                class: "min-w-full divide-y divide-slate-800 text-sm",
                thead {
                    class: "bg-slate-900 text-left text-xs uppercase tracking-wide text-slate-500",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Наименование" }
                        th { class: "px-4 py-3 font-medium", "Ед. изм" }
                        th { class: "px-4 py-3 font-medium text-right", "Кол-во" }
                        th { class: "px-4 py-3 font-medium text-right", "Цена ({currency})" }
                        th { class: "px-4 py-3 font-medium text-right", "Сумма ({currency})" }
                        th { class: "px-4 py-3" }
                    }
                }
                tbody {
                    class: "divide-y divide-slate-800",
                    for line in lines {
                        EstimateRowView {
                            line,
                            on_quantity: on_quantity.clone(),
                            on_remove: on_remove.clone(),
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct EstimateRowViewProps {
    line: EstimateLine,
    on_quantity: EventHandler<(String, f64)>,
    on_remove: EventHandler<String>,
}

#[component]
fn EstimateRowView(props: EstimateRowViewProps) -> Element {
    let line = props.line;
    let quantity_display = format_quantity(line.quantity);
    let price_display = format_money(line.unit_price);
    let subtotal_display = format_money(line.subtotal);
    let quantity_key = line.name.clone();
    let remove_key = line.name.clone();
    rsx! {
        tr {
            class: "hover:bg-slate-800/40",
            td { class: "px-4 py-3 font-medium text-slate-100", "{line.name}" }
            td { class: "px-4 py-3 text-slate-300", "{line.unit}" }
            td {
                class: "px-4 py-3 text-right",
                input {
                    r#type: "number",
                    class: "w-24 rounded-lg border border-slate-700 bg-slate-950 px-3 py-1.5 text-right text-sm text-slate-100 focus:border-indigo-500 focus:outline-none",
                    min: "0",
                    step: "1",
                    value: "{quantity_display}",
                    oninput: move |evt| {
                        if let Ok(quantity) = evt.value().trim().parse::<f64>() {
                            props.on_quantity.call((quantity_key.clone(), quantity));
                        }
                    },
                }
            }
            td { class: "px-4 py-3 text-right text-slate-300", "{price_display}" }
            td { class: "px-4 py-3 text-right font-medium text-slate-100", "{subtotal_display}" }
            td {
                class: "px-4 py-3 text-right",
                button {
                    class: "rounded-md border border-rose-500/40 px-2 py-1 text-[10px] font-semibold uppercase tracking-wide text-rose-200 hover:bg-rose-500/10",
                    onclick: move |_| props.on_remove.call(remove_key.clone()),
                    "Убрать"
                }
            }
        }
    }
}
