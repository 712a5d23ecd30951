//! 상삼각 쌍 축소.
//!
//! 대칭 상관행렬을 중복 없는 쌍 목록으로 평탄화합니다. 쌍은 행 우선
//! 순서 (0,1), (0,2), ..., (1,2), ... 로 열거되며, 이 순서는 top-K
//! 선택의 동점 처리 기준으로도 사용됩니다.

use crate::correlation::CorrelationMatrix;

/// 서로 다른 두 종목의 상관계수.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCorrelation {
    /// 첫 번째 종목의 열 인덱스 (a < b)
    pub a: usize,
    /// 두 번째 종목의 열 인덱스
    pub b: usize,
    /// 상관계수. 정의되지 않은 쌍은 `None`
    pub value: Option<f64>,
}

/// 상관행렬의 엄격한 상삼각을 쌍 목록으로 변환합니다.
///
/// N개 종목에 대해 정확히 N*(N-1)/2개의 쌍을 반환합니다. 정의되지
/// 않은 쌍도 `None` 값으로 포함되므로 호출자가 제외 여부를 결정합니다.
pub fn upper_triangle_pairs(matrix: &CorrelationMatrix) -> Vec<PairCorrelation> {
    let n = matrix.num_tickers();
    let mut pairs = Vec::with_capacity(n.saturating_sub(1) * n / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(PairCorrelation {
                a: i,
                b: j,
                value: matrix.values[i][j],
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_matrix(n: usize) -> CorrelationMatrix {
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    values[i][j] = Some(1.0);
                } else {
                    // 셀마다 다른 값을 줘서 위치 대응을 검증한다
                    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
                    values[i][j] = Some((lo * 100 + hi) as f64 / 10_000.0);
                }
            }
        }
        CorrelationMatrix {
            tickers: (0..n).map(|i| format!("T{}", i)).collect(),
            values,
            window: 20,
        }
    }

    #[test]
    fn test_pair_count_and_order() {
        let pairs = upper_triangle_pairs(&make_matrix(4));

        assert_eq!(pairs.len(), 6);
        let order: Vec<(usize, usize)> = pairs.iter().map(|p| (p.a, p.b)).collect();
        assert_eq!(order, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_pair_values_match_matrix() {
        let matrix = make_matrix(5);
        let pairs = upper_triangle_pairs(&matrix);

        for pair in &pairs {
            assert!(pair.a < pair.b);
            assert_eq!(pair.value, matrix.values[pair.a][pair.b]);
        }
    }

    #[test]
    fn test_pair_list_keeps_undefined_entries() {
        let mut matrix = make_matrix(3);
        matrix.values[0][2] = None;
        matrix.values[2][0] = None;

        let pairs = upper_triangle_pairs(&matrix);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1].value, None);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(upper_triangle_pairs(&make_matrix(0)).is_empty());
        assert!(upper_triangle_pairs(&make_matrix(1)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_pair_count_is_n_choose_2(n in 0usize..40) {
            let pairs = upper_triangle_pairs(&make_matrix(n));
            prop_assert_eq!(pairs.len(), n.saturating_sub(1) * n / 2);
        }
    }
}
