use crate::view::CategoryFilter;

/// Everything a user can do to the storefront. Renderers emit these as
/// `data-action` attributes and terminals type them as commands; both end
/// up in `Storefront::dispatch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    AddToCart(u64),
    RemoveOne(u64),
    RemoveAll(u64),
    Checkout,
    NextPage,
    PrevPage,
    GoToPage(usize),
    SetPageSize(usize),
    FilterCategory(CategoryFilter),
}

impl Action {
    /// Attribute name the HTML renderer writes for this action.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Action::AddToCart(_) => "add-to-cart",
            Action::RemoveOne(_) => "remove-one",
            Action::RemoveAll(_) => "remove-all",
            Action::Checkout => "checkout",
            Action::NextPage => "next-page",
            Action::PrevPage => "prev-page",
            Action::GoToPage(_) => "go-to-page",
            Action::SetPageSize(_) => "set-page-size",
            Action::FilterCategory(_) => "filter-category",
        }
    }

    /// Decodes the `data-action` attribute plus whichever of
    /// `data-product-id` / element value accompanies it.
    pub fn from_attributes(
        action: &str,
        product_id: Option<&str>,
        value: Option<&str>,
    ) -> Result<Self, String> {
        let id = || -> Result<u64, String> {
            let raw = product_id.ok_or_else(|| format!("'{action}' needs a product id"))?;
            parse_id(raw)
        };
        let number = || -> Result<usize, String> {
            let raw = value.ok_or_else(|| format!("'{action}' needs a value"))?;
            parse_positive(raw)
        };
        match action.trim() {
            "add-to-cart" => Ok(Action::AddToCart(id()?)),
            "remove-one" => Ok(Action::RemoveOne(id()?)),
            "remove-all" => Ok(Action::RemoveAll(id()?)),
            "checkout" => Ok(Action::Checkout),
            "next-page" => Ok(Action::NextPage),
            "prev-page" => Ok(Action::PrevPage),
            "go-to-page" => Ok(Action::GoToPage(number()?)),
            "set-page-size" => Ok(Action::SetPageSize(number()?)),
            "filter-category" => {
                let raw = value.ok_or_else(|| format!("'{action}' needs a value"))?;
                Ok(Action::FilterCategory(CategoryFilter::parse(raw)))
            }
            other => Err(format!("unknown action '{other}'")),
        }
    }

    /// Parses a terminal command such as `add 3`, `page 2` or `category beauty`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (trimmed, ""),
        };
        let need = |what: &str| require(verb, rest, what);
        match verb.to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Action::AddToCart(parse_id(need("a product id")?)?)),
            "minus" | "-" => Ok(Action::RemoveOne(parse_id(need("a product id")?)?)),
            "remove" | "rm" => Ok(Action::RemoveAll(parse_id(need("a product id")?)?)),
            "checkout" => Ok(Action::Checkout),
            "next" | "n" => Ok(Action::NextPage),
            "prev" | "p" => Ok(Action::PrevPage),
            "page" => Ok(Action::GoToPage(parse_positive(need("a page number")?)?)),
            "size" => Ok(Action::SetPageSize(parse_positive(need("a page size")?)?)),
            "category" | "cat" => Ok(Action::FilterCategory(CategoryFilter::parse(need(
                "a category or 'all'",
            )?))),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

fn require<'a>(verb: &str, rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("'{verb}' expects {what}"))
    } else {
        Ok(rest)
    }
}

fn parse_id(raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid product id '{}'", raw.trim()))
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a positive integer, got '{}'", raw.trim())),
    }
}
