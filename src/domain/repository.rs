use super::model::catalog::Catalog;

/// 永続化の抽象。Infra層が実装する。
pub trait CatalogRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 保存先が存在しなければ空の目録を返す。
    fn load(&self) -> Result<Catalog, Self::Error>;
    /// 目録全体を上書き保存する。
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;
}
