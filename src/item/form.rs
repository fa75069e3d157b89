use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    item::{Item, ItemUpdate},
};

/// The fields of the add and edit spend forms, named as the browser sends them.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemForm {
    #[serde(rename = "nameOfItem")]
    pub name: String,
    pub price: f64,
    #[serde(rename = "paymentMode")]
    pub payment_mode: String,
    pub date: Date,
}

impl From<ItemForm> for ItemUpdate {
    fn from(form: ItemForm) -> Self {
        Self {
            name: form.name,
            price: form.price,
            payment_mode: form.payment_mode,
            date: form.date,
        }
    }
}

/// The values to pre-fill the form fields with.
#[derive(Default)]
pub struct ItemFormDefaults<'a> {
    pub name: Option<&'a str>,
    pub price: Option<f64>,
    pub payment_mode: Option<&'a str>,
    pub date: Option<Date>,
    /// Shown under the name field when the name was rejected.
    pub name_error: Option<&'a str>,
}

impl<'a> From<&'a Item> for ItemFormDefaults<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            name: Some(&item.name),
            price: Some(item.price),
            payment_mode: Some(&item.payment_mode),
            date: Some(item.date),
            name_error: None,
        }
    }
}

impl<'a> From<&'a ItemForm> for ItemFormDefaults<'a> {
    fn from(form: &'a ItemForm) -> Self {
        Self {
            name: Some(&form.name),
            price: Some(form.price),
            payment_mode: Some(&form.payment_mode),
            date: Some(form.date),
            name_error: None,
        }
    }
}

pub fn item_form_fields(defaults: &ItemFormDefaults<'_>) -> Markup {
    let price_str = defaults.price.map(|price| format!("{price:.2}"));

    html! {
        div
        {
            label for="nameOfItem" class=(FORM_LABEL_STYLE) { "Item" }

            input
                name="nameOfItem"
                id="nameOfItem"
                type="text"
                placeholder="What did you buy?"
                value=[defaults.name]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            @if let Some(name_error) = defaults.name_error
            {
                p class="text-red-500 text-base" { (name_error) }
            }
        }

        div
        {
            label for="price" class=(FORM_LABEL_STYLE) { "Price" }

            input
                name="price"
                id="price"
                type="number"
                step="0.01"
                placeholder="0.00"
                value=[price_str.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="paymentMode" class=(FORM_LABEL_STYLE) { "Payment mode" }

            input
                name="paymentMode"
                id="paymentMode"
                type="text"
                list="payment-modes"
                placeholder="Cash, Card, UPI..."
                value=[defaults.payment_mode]
                required
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="payment-modes"
            {
                option value="Cash" {}
                option value="Card" {}
                option value="UPI" {}
                option value="Bank transfer" {}
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=[defaults.date]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
