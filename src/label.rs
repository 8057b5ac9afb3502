/// 从图片文件名推导病症标签
///
/// - 文件名中**恰好**包含一个 `-` 时，取 `-` 之前的部分
/// - 否则按 `_` 切分，取前两段并用 `-` 连接；没有 `_` 时返回原文件名
///
/// 不做大小写转换，也不去除扩展名。
pub fn derive_condition(filename: &str) -> String {
    if filename.matches('-').count() == 1 {
        if let Some((head, _)) = filename.split_once('-') {
            return head.to_string();
        }
    }
    filename.splitn(3, '_').take(2).collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single_hyphen("NORMAL-1234.png", "NORMAL")]
    #[case::underscores("COVID_patient_001.png", "COVID-patient")]
    #[case::two_hyphens("x-ray-image.png", "x-ray-image.png")]
    #[case::plain("image.png", "image.png")]
    #[case::one_underscore("Viral_Pneumonia.png", "Viral-Pneumonia.png")]
    #[case::hyphens_and_underscores("Lung-Opacity-a_b_c.png", "Lung-Opacity-a-b")]
    #[case::hyphen_wins_over_underscore("Lung_Opacity-12.png", "Lung_Opacity")]
    #[case::extension_kept("a.png_b", "a.png-b")]
    #[case::leading_hyphen("-1.png", "")]
    #[case::case_preserved("covid_X_1", "covid-X")]
    fn derive_examples(#[case] filename: &str, #[case] expected: &str) {
        assert_eq!(derive_condition(filename), expected);
    }

    /// 枚举 `{a, -, _, .}` 上长度不超过 6 的所有文件名
    fn all_names() -> Vec<String> {
        const ALPHABET: [char; 4] = ['a', '-', '_', '.'];
        let mut names = vec![];
        let mut layer = vec![String::new()];
        for _ in 0..6 {
            layer = layer
                .iter()
                .flat_map(|prefix| {
                    ALPHABET.iter().map(move |c| {
                        let mut s = prefix.clone();
                        s.push(*c);
                        s
                    })
                })
                .collect();
            names.extend(layer.iter().cloned());
        }
        names
    }

    #[test]
    fn single_hyphen_takes_prefix() {
        for name in all_names().iter().filter(|s| s.matches('-').count() == 1) {
            let expected = name.split('-').next().unwrap();
            assert_eq!(derive_condition(name), expected, "filename: {name:?}");
        }
    }

    #[test]
    fn other_hyphen_counts_join_underscore_segments() {
        for name in all_names().iter().filter(|s| s.matches('-').count() != 1) {
            let expected = name.split('_').take(2).collect::<Vec<_>>().join("-");
            assert_eq!(derive_condition(name), expected, "filename: {name:?}");
            if !name.contains('_') {
                assert_eq!(derive_condition(name), *name);
            }
        }
    }
}
