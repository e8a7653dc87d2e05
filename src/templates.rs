//! Starter programs
//!
//! Each template is a small Python program whose trace exercises one of the
//! visualization modes. A template also says which generated input fits it:
//! the generator's driver calls (`binary_search(arr, target)`,
//! `dfs(graph, 'A', set())`, `bfs(graph, 'A')`) only make sense after the
//! template that defines the called function.

use crate::generator::TraversalFamily;

/// Kind of generated input a template can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFamily {
    /// Array plus a `binary_search` driver call
    Array,
    /// Adjacency literal plus a traversal driver call
    Graph(TraversalFamily),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Command-line name
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// `None` when no generated input matches the program's entry point
    pub inputs: Option<InputFamily>,
    pub code: &'static str,
}

pub static TEMPLATES: [Template; 9] = [
    Template {
        slug: "binary-search",
        name: "Binary Search",
        description: "Find a target efficiently in a sorted array.",
        inputs: Some(InputFamily::Array),
        code: r#"def binary_search(arr, target):
    left, right = 0, len(arr) - 1

    while left <= right:
        mid = (left + right) // 2
        if arr[mid] == target:
            return mid
        elif arr[mid] < target:
            left = mid + 1
        else:
            right = mid - 1

    return -1

# Test case with 30 elements
arr = [i * 2 for i in range(30)]
target = 42
result = binary_search(arr, target)
print(f"Index of {target}: {result}")
"#,
    },
    Template {
        slug: "dfs",
        name: "DFS (Graph)",
        description: "Depth-first search goes deeper before backtracking.",
        inputs: Some(InputFamily::Graph(TraversalFamily::Dfs)),
        code: r#"def dfs(graph, node, visited):
    if node not in visited:
        visited.add(node)
        print(f"Visited: {node}")

        for neighbor in graph[node]:
            dfs(graph, neighbor, visited)

# Adjacency list
graph = {
    'A': ['B', 'C'],
    'B': ['D', 'E'],
    'C': ['F'],
    'D': [],
    'E': ['F'],
    'F': []
}
visited = set()
dfs(graph, 'A', visited)
"#,
    },
    Template {
        slug: "bfs",
        name: "BFS (Graph)",
        description: "Breadth-first search visits every neighbor at one depth first.",
        inputs: Some(InputFamily::Graph(TraversalFamily::Bfs)),
        code: r#"from collections import deque

def bfs(graph, start):
    visited = set()
    queue = deque([start])
    visited.add(start)

    while queue:
        node = queue.popleft()
        print(f"Visited: {node}")

        for neighbor in graph[node]:
            if neighbor not in visited:
                visited.add(neighbor)
                queue.append(neighbor)

graph = {
    'A': ['B', 'C'],
    'B': ['D', 'E'],
    'C': ['F'],
    'D': [],
    'E': ['F'],
    'F': []
}
bfs(graph, 'A')
"#,
    },
    Template {
        slug: "prefix-sum",
        name: "Prefix Sum",
        description: "Precompute sums to answer range queries in O(1).",
        inputs: None,
        code: r#"def prefix_sum(arr):
    n = len(arr)
    prefix = [0] * n
    prefix[0] = arr[0]

    for i in range(1, n):
        prefix[i] = prefix[i-1] + arr[i]

    return prefix

def range_sum(prefix, L, R):
    if L == 0:
        return prefix[R]
    return prefix[R] - prefix[L-1]

arr = [1, 2, 3, 4, 5, 6]
print(f"Original: {arr}")

psum = prefix_sum(arr)
print(f"Prefix Sum: {psum}")

# Sum of range [1, 4] -> 2+3+4+5 = 14
L, R = 1, 4
total = range_sum(psum, L, R)
print(f"Sum[{L}, {R}]: {total}")
"#,
    },
    Template {
        slug: "answer-search",
        name: "Binary Search (Answer)",
        description: "Binary search over the answer space, e.g. minimum ship capacity.",
        inputs: None,
        code: r#"def check(weights, capacity, days):
    required_days = 1
    current_load = 0

    for w in weights:
        if current_load + w > capacity:
            required_days += 1
            current_load = 0
        current_load += w

    return required_days <= days

def ship_within_days(weights, days):
    left = max(weights)
    right = sum(weights)
    ans = right

    while left <= right:
        mid = (left + right) // 2

        if check(weights, mid, days):
            ans = mid
            right = mid - 1
        else:
            left = mid + 1

    return ans

# Ship weights within 5 days
weights = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
days = 5
min_capacity = ship_within_days(weights, days)
print(f"Minimum Capacity: {min_capacity}")
"#,
    },
    Template {
        slug: "knapsack",
        name: "0/1 Knapsack (DP)",
        description: "Fill a (items x capacity) table of best values.",
        inputs: None,
        code: r#"def knapsack(weights, values, capacity):
    n = len(weights)
    dp = [[0] * (capacity + 1) for _ in range(n + 1)]

    for i in range(1, n + 1):
        for w in range(capacity + 1):
            dp[i][w] = dp[i - 1][w]
            if weights[i - 1] <= w:
                dp[i][w] = max(dp[i][w], dp[i - 1][w - weights[i - 1]] + values[i - 1])

    return dp[n][capacity]

weights = [1, 3, 4, 5]
values = [1, 4, 5, 7]
capacity = 7
print(f"Best value: {knapsack(weights, values, capacity)}")
"#,
    },
    Template {
        slug: "fibonacci-memo",
        name: "Fibonacci (Memo)",
        description: "Top-down DP that caches each subproblem once.",
        inputs: None,
        code: r#"def fib(n, memo):
    if n in memo:
        return memo[n]
    if n <= 1:
        return n
    memo[n] = fib(n - 1, memo) + fib(n - 2, memo)
    return memo[n]

memo = {}
print(f"fib(10) = {fib(10, memo)}")
"#,
    },
    Template {
        slug: "bubble-sort",
        name: "Bubble Sort",
        description: "Swap adjacent out-of-order pairs until the array is sorted.",
        inputs: None,
        code: r#"def bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        for j in range(0, n - i - 1):
            if arr[j] > arr[j + 1]:
                arr[j], arr[j + 1] = arr[j + 1], arr[j]
    return arr

arr = [5, 1, 4, 2, 8, 3]
print(bubble_sort(arr))
"#,
    },
    Template {
        slug: "tree-inorder",
        name: "Inorder Traversal (Tree)",
        description: "Visit a binary search tree left, root, right.",
        inputs: None,
        code: r#"def inorder(root, out):
    if root is None:
        return out
    inorder(root['left'], out)
    out.append(root['val'])
    inorder(root['right'], out)
    return out

root = {
    'val': 8,
    'left': {
        'val': 3,
        'left': {'val': 1, 'left': None, 'right': None},
        'right': {'val': 6, 'left': None, 'right': None},
    },
    'right': {
        'val': 10,
        'left': None,
        'right': {'val': 14, 'left': None, 'right': None},
    },
}
print(inorder(root, []))
"#,
    },
];

/// Look a template up by slug or display name, ignoring case
pub fn find(query: &str) -> Option<&'static Template> {
    let query = query.trim();
    TEMPLATES
        .iter()
        .find(|t| t.slug.eq_ignore_ascii_case(query) || t.name.eq_ignore_ascii_case(query))
}

/// The template after `current` in catalog order, wrapping around
pub fn next_after(current: Option<&Template>) -> &'static Template {
    let index = current
        .and_then(|c| TEMPLATES.iter().position(|t| t.slug == c.slug))
        .map_or(0, |i| (i + 1) % TEMPLATES.len());
    &TEMPLATES[index]
}
