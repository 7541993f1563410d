use crate::core::config::CommerceConfig;
use url::Url;

/// 根据物品名生成固定电商搜索链接，纯函数，无网络请求
#[derive(Debug, Clone)]
pub struct ShopLinkBuilder {
    base: Url,
    query_param: String,
}

impl ShopLinkBuilder {
    pub fn new(config: &CommerceConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(&config.search_base)?,
            query_param: config.query_param.clone(),
        })
    }

    pub fn link_for(&self, name: &str) -> Url {
        let pair = format!("{}={}", encode_component(&self.query_param), encode_component(name));
        let mut url = self.base.clone();
        let query = match self.base.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{pair}"),
            _ => pair,
        };
        url.set_query(Some(&query));
        url
    }
}

/// 组件级百分号编码：空格为 `%20`，`!~*()` 保持原样
fn encode_component(value: &str) -> String {
    // form 编码只会把空格输出成 '+'，字面 '+' 已是 %2B
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%21", "!")
        .replace("%7E", "~")
        .replace("%28", "(")
        .replace("%29", ")")
}
