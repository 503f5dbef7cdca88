//! Display labels
//!
//! One static table keyed by (locale, id) for attribute names and the few
//! status strings a front end needs. Presentation data only.

use crate::attributes::AttributeField;
use crate::preferences::Locale;

/// Non-attribute strings shown by front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiText {
    Title,
    PricePerArea,
    TotalPrice,
    Submitting,
    Failed,
    EmptyLink,
    ModeManual,
    ModeLink,
    Idle,
}

/// Display label of an attribute
pub fn field_label(locale: Locale, field: AttributeField) -> &'static str {
    use AttributeField::*;

    match (locale, field) {
        (Locale::Ru, District) => "Район",
        (Locale::Ru, Class) => "Класс жилья",
        (Locale::Ru, Building) => "Корпус",
        (Locale::Ru, FloorsTotal) => "Всего этажей",
        (Locale::Ru, Phase) => "Очередь",
        (Locale::Ru, BuildingType) => "Тип здания",
        (Locale::Ru, Floor) => "Этаж",
        (Locale::Ru, Section) => "Секция",
        (Locale::Ru, PropertyType) => "Тип недвижимости",
        (Locale::Ru, PropertyCategory) => "Категория",
        (Locale::Ru, Apartments) => "Квартиры",
        (Locale::Ru, Finishing) => "Отделка",
        (Locale::Ru, Status) => "Статус",
        (Locale::Ru, ApartmentOption) => "Вариант кв.",
        (Locale::Ru, Mortgage) => "Ипотека",
        (Locale::Ru, Subsidies) => "Субсидии",
        (Locale::Ru, Layout) => "Планировка",
        (Locale::Ru, CeilingHeight) => "Высота потолков",
        (Locale::Ru, TotalArea) => "Общая площадь",
        (Locale::Ru, AreaWithoutBalcony) => "Площадь без балкона",
        (Locale::Ru, LivingArea) => "Жилая площадь",
        (Locale::Ru, KitchenArea) => "Площадь кухни",
        (Locale::Ru, HallwayArea) => "Площадь коридора",
        (Locale::Ru, BathroomArea) => "Площадь ванной",
        (Locale::Ru, BalconyArea) => "Площадь балкона",
        (Locale::Ru, PlotArea) => "Площадь участка",
        (Locale::Ru, DeveloperEncoded) => "Застройщик (код)",
        (Locale::Ru, ComplexEncoded) => "Комплекс (код)",

        (Locale::En, District) => "District",
        (Locale::En, Class) => "Housing class",
        (Locale::En, Building) => "Building",
        (Locale::En, FloorsTotal) => "Total floors",
        (Locale::En, Phase) => "Phase",
        (Locale::En, BuildingType) => "Building type",
        (Locale::En, Floor) => "Floor",
        (Locale::En, Section) => "Section",
        (Locale::En, PropertyType) => "Property type",
        (Locale::En, PropertyCategory) => "Category",
        (Locale::En, Apartments) => "Apartments",
        (Locale::En, Finishing) => "Finishing",
        (Locale::En, Status) => "Status",
        (Locale::En, ApartmentOption) => "Apartment option",
        (Locale::En, Mortgage) => "Mortgage",
        (Locale::En, Subsidies) => "Subsidies",
        (Locale::En, Layout) => "Layout",
        (Locale::En, CeilingHeight) => "Ceiling height",
        (Locale::En, TotalArea) => "Total area",
        (Locale::En, AreaWithoutBalcony) => "Area without balcony",
        (Locale::En, LivingArea) => "Living area",
        (Locale::En, KitchenArea) => "Kitchen area",
        (Locale::En, HallwayArea) => "Hallway area",
        (Locale::En, BathroomArea) => "Bathroom area",
        (Locale::En, BalconyArea) => "Balcony area",
        (Locale::En, PlotArea) => "Plot area",
        (Locale::En, DeveloperEncoded) => "Developer (code)",
        (Locale::En, ComplexEncoded) => "Complex (code)",
    }
}

/// Display text of a front-end string
pub fn ui_text(locale: Locale, id: UiText) -> &'static str {
    match (locale, id) {
        (Locale::Ru, UiText::Title) => "Оценка стоимости недвижимости",
        (Locale::Ru, UiText::PricePerArea) => "Цена за м²",
        (Locale::Ru, UiText::TotalPrice) => "Общая стоимость",
        (Locale::Ru, UiText::Submitting) => "Расчёт...",
        (Locale::Ru, UiText::Failed) => "Ошибка",
        (Locale::Ru, UiText::EmptyLink) => "Введите ссылку на объявление",
        (Locale::Ru, UiText::ModeManual) => "Ручной ввод",
        (Locale::Ru, UiText::ModeLink) => "По ссылке",
        (Locale::Ru, UiText::Idle) => "Нет результата",

        (Locale::En, UiText::Title) => "Real Estate Price Predictor",
        (Locale::En, UiText::PricePerArea) => "Price per m²",
        (Locale::En, UiText::TotalPrice) => "Total estimated price",
        (Locale::En, UiText::Submitting) => "Predicting...",
        (Locale::En, UiText::Failed) => "Error",
        (Locale::En, UiText::EmptyLink) => "Enter a listing URL",
        (Locale::En, UiText::ModeManual) => "Manual input",
        (Locale::En, UiText::ModeLink) => "From link",
        (Locale::En, UiText::Idle) => "No result yet",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_distinct_labels() {
        for field in AttributeField::ALL {
            let ru = field_label(Locale::Ru, field);
            let en = field_label(Locale::En, field);
            assert!(!ru.is_empty() && !en.is_empty(), "{} missing label", field);
        }
        assert_ne!(
            field_label(Locale::Ru, AttributeField::TotalArea),
            field_label(Locale::En, AttributeField::TotalArea)
        );
    }

    #[test]
    fn test_ui_text_lookup() {
        assert_eq!(ui_text(Locale::En, UiText::TotalPrice), "Total estimated price");
        assert_eq!(ui_text(Locale::Ru, UiText::PricePerArea), "Цена за м²");
    }
}
