//! Sample rows written once when a table is first created

use crate::parser::SqlValue;

use super::tables::{DISHES, INGREDIENTS, RESERVATIONS, STAFF, USERS};
use super::types::TableSchema;

const SEED_USERS: &[(&str, &str, &str)] = &[("admin", "admin", "admin"), ("user", "user", "user")];

const SEED_DISHES: &[(&str, &str, &str, f64, &str)] = &[
    ("Салат Цезарь", "Салат с курицей и пармезаном", "курица, пармезан, романо, соус Цезарь", 350.00, "Закуска"),
    ("Борщ", "Украинский суп с свеклой", "свекла, капуста, картофель, мясо", 250.00, "Супы"),
    ("Стейк", "Говяжий стейк с картофелем", "говядина, картофель, специи", 1200.00, "Основное блюдо"),
    ("Тирамису", "Итальянский десерт с кофе", "маскарпоне, кофе, бисквиты, какао", 400.00, "Десерты"),
    ("Пицца Маргарита", "Пицца с томатами и сыром", "томатный соус, моцарелла, базилик", 600.00, "Основное блюдо"),
    ("Спагетти", "Спагетти с томатным соусом", "спагетти, томаты, специи", 500.00, "Основное блюдо"),
    ("Фруктовый салат", "Салат из свежих фруктов", "яблоки, груши, бананы, виноград", 300.00, "Закуска"),
    ("Кофе", "Крепкий черный кофе", "кофейные зерна, вода", 150.00, "Напитки"),
    ("Чай", "Чай черный или зеленый", "чайные листья, вода", 100.00, "Напитки"),
    ("Морс", "Напиток из ягод", "ягоды, сахар, вода", 200.00, "Напитки"),
    ("Суп Минестроне", "Итальянский овощной суп", "овощи, паста, бульон", 300.00, "Супы"),
    ("Куриное филе", "Запеченное куриное филе", "куриное филе, специи", 600.00, "Основное блюдо"),
    ("Блинчики", "Блинчики с ягодами", "мука, яйца, ягоды", 350.00, "Десерты"),
    ("Огуречный салат", "Салат из свежих огурцов", "огурцы, укроп, сметана", 200.00, "Закуска"),
    ("Котлета по-киевски", "Куриная котлета с зеленью", "куриное мясо, зелень, панировка", 700.00, "Основное блюдо"),
    ("Крем-брюле", "Десерт с карамельной корочкой", "сливки, яйца, сахар", 400.00, "Десерты"),
    ("Лимонад", "Освежающий лимонад", "лимон, сахар, вода", 250.00, "Напитки"),
    ("Суп-пюре", "Суп из брокколи", "брокколи, сливки, специи", 300.00, "Супы"),
    ("Медовик", "Торт с медом", "мука, мед, яйца", 350.00, "Десерты"),
    ("Чизкейк", "Творожный десерт", "творог, сахар, яйца, печенье", 400.00, "Десерты"),
];

const SEED_RESERVATIONS: &[(&str, &str, i64, i64)] = &[
    ("Иван Иванов", "2024-11-10 19:00", 4, 1),
    ("Петр Петров", "2024-11-11 20:00", 2, 3),
    ("Светлана Сидорова", "2024-11-12 18:00", 3, 2),
    ("Анна Смирнова", "2024-11-13 17:30", 5, 4),
    ("Олег Сидоров", "2024-11-14 19:00", 1, 5),
    ("Елена Кузнецова", "2024-11-15 20:00", 6, 1),
];

const SEED_STAFF: &[(&str, &str, f64, &str)] = &[
    ("Александр Смирнов", "Официант", 30000.00, "2023-01-15"),
    ("Мария Кузнецова", "Повар", 50000.00, "2022-05-10"),
    ("Екатерина Васильева", "Администратор", 40000.00, "2021-03-25"),
    ("Дмитрий Федоров", "Бариста", 35000.00, "2023-07-01"),
    ("Ирина Сергеева", "Уборщица", 20000.00, "2023-09-10"),
    ("Сергей Николаев", "Сомелье", 45000.00, "2020-11-20"),
];

const SEED_INGREDIENTS: &[(&str, i64, &str)] = &[
    ("Курица", 50, "кг"),
    ("Говядина", 30, "кг"),
    ("Помидоры", 100, "кг"),
    ("Сыр", 20, "кг"),
    ("Яйца", 200, "шт"),
    ("Мука", 150, "кг"),
    ("Сахар", 100, "кг"),
    ("Ягоды", 50, "кг"),
    ("Зелень", 30, "пакетов"),
    ("Специи", 20, "банок"),
];

fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

/// Seed rows for a table, each in the table's declared column order
pub fn seed_rows(schema: &TableSchema) -> Vec<Vec<SqlValue>> {
    match schema.name {
        n if n == USERS.name => SEED_USERS
            .iter()
            .map(|(username, password, role)| vec![text(username), text(password), text(role)])
            .collect(),
        n if n == DISHES.name => SEED_DISHES
            .iter()
            .map(|(name, description, ingredients, price, category)| {
                vec![
                    text(name),
                    text(description),
                    text(ingredients),
                    SqlValue::Real(*price),
                    text(category),
                ]
            })
            .collect(),
        n if n == RESERVATIONS.name => SEED_RESERVATIONS
            .iter()
            .map(|(customer, date, guests, table)| {
                vec![
                    text(customer),
                    text(date),
                    SqlValue::Integer(*guests),
                    SqlValue::Integer(*table),
                ]
            })
            .collect(),
        n if n == STAFF.name => SEED_STAFF
            .iter()
            .map(|(name, position, salary, hire_date)| {
                vec![text(name), text(position), SqlValue::Real(*salary), text(hire_date)]
            })
            .collect(),
        n if n == INGREDIENTS.name => SEED_INGREDIENTS
            .iter()
            .map(|(name, quantity, unit)| vec![text(name), SqlValue::Integer(*quantity), text(unit)])
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::ALL_TABLES;

    #[test]
    fn test_seed_rows_match_column_count() {
        for table in ALL_TABLES {
            let rows = seed_rows(table);
            assert!(!rows.is_empty(), "no seed rows for {}", table.name);
            for row in rows {
                assert_eq!(row.len(), table.columns.len(), "bad seed row in {}", table.name);
            }
        }
    }

    #[test]
    fn test_seed_dish_count() {
        assert_eq!(seed_rows(&DISHES).len(), 20);
        assert_eq!(seed_rows(&INGREDIENTS).len(), 10);
    }
}
