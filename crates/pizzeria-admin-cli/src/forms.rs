//! Turns `--price` / `--attr` flags into a product's price table and
//! attribute list, checked against the chosen category, and into the
//! template of a new category.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use pizzeria_admin_core::models::{
    AttributeValue, Category, CategoryAttribute, PriceDimension, PriceType, ProductAttribute,
    ProductPrice, WidgetType,
};

/// Parse `DIMENSION:OPTION=AMOUNT` flags. Every option of every price
/// dimension in the category must be priced.
pub fn parse_prices(category: &Category, flags: &[String]) -> Result<BTreeMap<String, ProductPrice>> {
    let mut prices: BTreeMap<String, ProductPrice> = BTreeMap::new();

    for flag in flags {
        let (target, amount) = flag
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid price '{}', expected DIMENSION:OPTION=AMOUNT", flag))?;
        let (dimension, option) = target
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid price '{}', expected DIMENSION:OPTION=AMOUNT", flag))?;
        let (dimension, option) = (dimension.trim(), option.trim());

        let config = category.price_configuration.get(dimension).ok_or_else(|| {
            anyhow!("Category '{}' has no price dimension '{}'", category.name, dimension)
        })?;
        if !config.available_options.iter().any(|o| o == option) {
            bail!("'{}' is not an option of {}", option, dimension);
        }
        let amount: f64 = amount
            .trim()
            .parse()
            .with_context(|| format!("Invalid amount in '{}'", flag))?;
        if amount < 0.0 {
            bail!("Price for {}:{} cannot be negative", dimension, option);
        }

        prices
            .entry(dimension.to_string())
            .or_insert_with(|| ProductPrice {
                price_type: config.price_type,
                available_options: BTreeMap::new(),
            })
            .available_options
            .insert(option.to_string(), amount);
    }

    for (dimension, config) in &category.price_configuration {
        for option in &config.available_options {
            let priced = prices
                .get(dimension)
                .map(|p| p.available_options.contains_key(option))
                .unwrap_or(false);
            if !priced {
                bail!("Missing price for {}:{}", dimension, option);
            }
        }
    }

    Ok(prices)
}

/// Parse `NAME=VALUE` flags; attributes left out take the category default.
pub fn parse_attributes(category: &Category, flags: &[String]) -> Result<Vec<ProductAttribute>> {
    let mut given: BTreeMap<&str, &str> = BTreeMap::new();
    for flag in flags {
        let (name, value) = flag
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid attribute '{}', expected NAME=VALUE", flag))?;
        given.insert(name.trim(), value.trim());
    }

    for name in given.keys() {
        if !category.attributes.iter().any(|a| a.name == *name) {
            bail!("Category '{}' has no attribute '{}'", category.name, name);
        }
    }

    category
        .attributes
        .iter()
        .map(|attribute| {
            let value = match given.get(attribute.name.as_str()) {
                None => attribute.initial_value(),
                Some(raw) => match attribute.widget_type {
                    WidgetType::Switch => AttributeValue::Flag(parse_switch(raw)?),
                    WidgetType::Radio => {
                        if !attribute.available_options.is_empty()
                            && !attribute.available_options.iter().any(|o| o == raw)
                        {
                            bail!(
                                "'{}' is not an option of {} ({})",
                                raw,
                                attribute.name,
                                attribute.available_options.join(", ")
                            );
                        }
                        AttributeValue::Choice(raw.to_string())
                    }
                },
            };
            Ok(ProductAttribute {
                name: attribute.name.clone(),
                value,
            })
        })
        .collect()
}

/// Parse `DIMENSION:TYPE=OPTION,OPTION` flags for a new category, where
/// TYPE is `base` or `additional`.
pub fn parse_price_dimensions(flags: &[String]) -> Result<BTreeMap<String, PriceDimension>> {
    if flags.is_empty() {
        bail!("A category needs at least one price dimension (--price)");
    }

    let mut dimensions = BTreeMap::new();
    for flag in flags {
        let (name, kind, options) = split_template(flag, "DIMENSION:TYPE=OPTION,OPTION")?;
        let price_type = match kind.to_ascii_lowercase().as_str() {
            "base" => PriceType::Base,
            "additional" | "aditional" => PriceType::Additional,
            other => bail!("Unknown price type '{}', expected base or additional", other),
        };
        if options.is_empty() {
            bail!("Price dimension {} has no options", name);
        }
        if dimensions
            .insert(
                name.to_string(),
                PriceDimension {
                    price_type,
                    available_options: options,
                },
            )
            .is_some()
        {
            bail!("Price dimension {} given twice", name);
        }
    }
    Ok(dimensions)
}

/// Parse `NAME:WIDGET=OPTION,OPTION` flags for a new category, where
/// WIDGET is `switch` or `radio`. The first option is the default; a
/// switch without options is `No,Yes`.
pub fn parse_category_attributes(flags: &[String]) -> Result<Vec<CategoryAttribute>> {
    let mut attributes: Vec<CategoryAttribute> = Vec::new();
    for flag in flags {
        let (name, kind, mut options) = split_template(flag, "NAME:WIDGET=OPTION,OPTION")?;
        let widget_type = match kind.to_ascii_lowercase().as_str() {
            "switch" => WidgetType::Switch,
            "radio" => WidgetType::Radio,
            other => bail!("Unknown widget '{}', expected switch or radio", other),
        };
        if widget_type == WidgetType::Switch && options.is_empty() {
            options = vec!["No".to_string(), "Yes".to_string()];
        }
        let default_value = options
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Attribute {} has no options", name))?;
        if attributes.iter().any(|a| a.name == name) {
            bail!("Attribute {} given twice", name);
        }
        attributes.push(CategoryAttribute {
            name: name.to_string(),
            widget_type,
            default_value,
            available_options: options,
        });
    }
    Ok(attributes)
}

/// Split `NAME:KIND=A,B` into its parts, dropping empty options.
fn split_template<'a>(flag: &'a str, expected: &str) -> Result<(&'a str, &'a str, Vec<String>)> {
    let invalid = || anyhow!("Invalid value '{}', expected {}", flag, expected);
    let (head, options) = flag.split_once('=').unwrap_or((flag, ""));
    let (name, kind) = head.split_once(':').ok_or_else(invalid)?;
    let (name, kind) = (name.trim(), kind.trim());
    if name.is_empty() || kind.is_empty() {
        return Err(invalid());
    }
    let options = options
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    Ok((name, kind, options))
}

fn parse_switch(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" => Ok(true),
        "no" | "false" | "off" => Ok(false),
        other => bail!("Expected yes or no, got '{}'", other),
    }
}
